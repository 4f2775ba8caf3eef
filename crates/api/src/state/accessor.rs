// Path: crates/api/src/state/accessor.rs
//! Defines the `StateAccess` trait for key-value storage operations.

use crate::state::StateScanIter;
use verdant_types::codec;
use verdant_types::error::StateError;
use parity_scale_codec::{Decode, Encode};

/// A dyn-safe trait that provides a complete interface for key-value storage operations,
/// including single-item, batch, and scanning methods.
///
/// Services only ever see a `&mut dyn StateAccess` (or `&dyn` for queries), so a
/// backend can be swapped without touching service code.
pub trait StateAccess: Send + Sync {
    /// Gets a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    /// Inserts a key-value pair.
    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError>;

    /// Deletes a key-value pair.
    fn delete(&mut self, key: &[u8]) -> Result<(), StateError>;

    /// Sets multiple key-value pairs in a single batch operation.
    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        for (key, value) in updates {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Gets multiple values by keys in a single batch operation.
    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Atomically applies a batch of inserts/updates and deletes.
    /// This is the method the execution layer commits a call's write set with.
    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError>;

    /// Scans for all key-value pairs starting with the given prefix, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError>;
}

// Blanket implementation to allow `StateAccess` to be used behind a `Box` trait object.
impl<T: StateAccess + ?Sized> StateAccess for Box<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        (**self).get(key)
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        (**self).insert(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        (**self).delete(key)
    }

    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        (**self).batch_set(updates)
    }

    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        (**self).batch_get(keys)
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        (**self).batch_apply(inserts, deletes)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        (**self).prefix_scan(prefix)
    }
}

/// Reads and decodes a SCALE-encoded record.
pub fn read_record<T: Decode>(
    state: &(impl StateAccess + ?Sized),
    key: &[u8],
) -> Result<Option<T>, StateError> {
    state
        .get(key)?
        .map(|bytes| codec::from_bytes_canonical(&bytes).map_err(StateError::Decode))
        .transpose()
}

/// Encodes and writes a record.
pub fn write_record<T: Encode>(
    state: &mut (impl StateAccess + ?Sized),
    key: &[u8],
    value: &T,
) -> Result<(), StateError> {
    let bytes = codec::to_bytes_canonical(value).map_err(StateError::InvalidValue)?;
    state.insert(key, &bytes)
}
