//! Local shoot cache
//!
//! The in-memory list of shoot records that every view renders from,
//! mirrored as one JSON array under a single storage key. Each mutation is
//! persisted before it is committed in memory, so a failed write leaves the
//! cache unchanged.

use super::kv_store::KeyValueStore;
use crate::error::{AppError, Result};
use crate::models::{ShootRecord, ShootUpdate};
use serde_json::Value;
use std::sync::Arc;

fn decode_records(values: Vec<Value>) -> Vec<ShootRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping unreadable persisted shoot at index {}: {}", index, e);
                None
            }
        })
        .collect()
}

pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    records: Vec<ShootRecord>,
}

impl LocalCache {
    /// Restore the cache from persisted storage.
    ///
    /// A missing key yields an empty cache, as does a payload that is not a
    /// JSON array. Individual records that no longer decode are logged and
    /// skipped; the rest are kept.
    pub fn restore(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        let records = match store.get(key) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Value>>(&json) {
                Ok(values) => decode_records(values),
                Err(e) => {
                    tracing::error!("Discarding corrupt persisted shoots under {:?}: {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!("Failed to read persisted shoots under {:?}: {}", key, e);
                Vec::new()
            }
        };

        tracing::info!("Restored {} shoots from local storage", records.len());

        Self {
            store,
            key: key.to_string(),
            records,
        }
    }

    pub fn records(&self) -> &[ShootRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ShootRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record; ids stay unique
    pub fn insert(&mut self, record: ShootRecord) -> Result<()> {
        if self.contains(&record.id) {
            return Err(AppError::DuplicateShoot(record.id));
        }
        record.payment.validate()?;

        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)
    }

    /// Merge `update` into the record with `id` and return the merged record
    pub fn update(&mut self, id: &str, update: &ShootUpdate) -> Result<ShootRecord> {
        let index = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| AppError::ShootNotFound(id.to_string()))?;

        let mut next = self.records.clone();
        update.merge_into(&mut next[index]);
        next[index].payment.validate()?;
        let merged = next[index].clone();

        self.commit(next)?;
        Ok(merged)
    }

    /// Remove the record with `id`, returning it if it was present
    pub fn remove(&mut self, id: &str) -> Result<Option<ShootRecord>> {
        let Some(index) = self.records.iter().position(|record| record.id == id) else {
            return Ok(None);
        };

        let mut next = self.records.clone();
        let removed = next.remove(index);

        self.commit(next)?;
        Ok(Some(removed))
    }

    /// Replace every record at once (used when the remote mirror loads)
    pub fn replace_all(&mut self, records: Vec<ShootRecord>) -> Result<()> {
        self.commit(records)
    }

    fn commit(&mut self, next: Vec<ShootRecord>) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.store.set(&self.key, &json)?;
        self.records = next;

        tracing::debug!("Persisted {} shoots under {:?}", self.records.len(), self.key);
        Ok(())
    }
}
