// Path: crates/storage/src/memory.rs
use std::collections::BTreeMap;
use std::sync::Arc;
use verdant_api::state::{StateAccess, StateScanIter};
use verdant_telemetry::storage_metrics;
use verdant_types::error::StateError;

/// A volatile, ordered in-memory key-value store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl StateAccess for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.data.remove(key);
        Ok(())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.data.remove(key);
        }
        let mut written = 0u64;
        for (key, value) in inserts {
            written = written.saturating_add(value.len() as u64);
            self.data.insert(key.clone(), value.clone());
        }
        storage_metrics().inc_batches_committed();
        storage_metrics().inc_bytes_written_total(written);
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let owned_prefix = prefix.to_vec();
        let iter = self
            .data
            .range(owned_prefix.clone()..)
            .take_while(move |(k, _)| k.starts_with(&owned_prefix))
            .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice()))));
        Ok(Box::new(iter))
    }
}
