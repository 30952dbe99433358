//! Remote mirror of the shoots table
//!
//! The remote store is an eventually-consistent copy of the local cache.
//! It is read once at startup and written best-effort after each local
//! mutation; it never decides what the user sees.

pub mod rest;
pub mod schema;

pub use rest::RestRemoteStore;
pub use schema::{update_columns, RemoteShootRow};

use crate::error::RemoteError;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Network port for the remote shoots table.
///
/// Rows cross this boundary in the remote (snake_case) shape.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch every row as raw JSON so malformed rows can be skipped one by one
    async fn select_all(&self) -> RemoteResult<Vec<Value>>;

    async fn insert(&self, row: &RemoteShootRow) -> RemoteResult<()>;

    /// Apply a column patch to the row with `id`
    async fn update(&self, id: &str, columns: &Map<String, Value>) -> RemoteResult<()>;

    async fn delete(&self, id: &str) -> RemoteResult<()>;
}

/// Whether `id` has the hyphenated 8-4-4-4-12 hexadecimal UUID shape.
///
/// Only such ids are mirrored; anything else is a local-only record.
pub fn is_uuid_shaped(id: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let mut parts = id.split('-');
    let shaped = GROUPS.iter().all(|&len| {
        parts
            .next()
            .is_some_and(|part| part.len() == len && part.chars().all(|c| c.is_ascii_hexdigit()))
    });

    shaped && parts.next().is_none()
}
