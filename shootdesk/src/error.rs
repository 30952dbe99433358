//! Error types for the shootdesk store
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to the frontend.

use thiserror::Error;

/// Failures talking to the remote shoots table
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Remote transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Remote payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Shoot not found: {0}")]
    ShootNotFound(String),

    #[error("Shoot already exists: {0}")]
    DuplicateShoot(String),

    #[error("Invalid shoot status: {0}")]
    InvalidStatus(String),

    #[error("Invalid payment: {0}")]
    InvalidPayment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
