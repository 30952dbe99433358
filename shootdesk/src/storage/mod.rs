//! Storage module
//!
//! Provides the key-value persistence port and the local shoot cache
//! built on top of it.

pub mod kv_store;
pub mod local_cache;

pub use kv_store::{FileStore, KeyValueStore, MemoryStore};
pub use local_cache::LocalCache;
