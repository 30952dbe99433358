//! shootdesk library
//!
//! Local-first store for property media shoots: a persisted local cache
//! that the dashboard renders from, mirrored best-effort to a remote table.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod services;
pub mod storage;
