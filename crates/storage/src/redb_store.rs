// Path: crates/storage/src/redb_store.rs
use redb::{Database, ReadableTable, TableDefinition};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use verdant_api::state::{StateAccess, StateKVPair, StateScanIter};
use verdant_telemetry::storage_metrics;
use verdant_types::error::StateError;

/// The single table holding the flat, namespaced keyspace.
const STATE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("STATE");

fn backend<E: Display>(e: E) -> StateError {
    StateError::Backend(e.to_string())
}

/// A durable `StateAccess` backend on top of a single redb database file.
///
/// Every mutating method runs in its own write transaction, so a committed
/// `batch_apply` is either fully on disk or not at all.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Opens the database at `path`, creating the file and table if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let db = Database::create(path.as_ref()).map_err(backend)?;
        {
            let w = db.begin_write().map_err(backend)?;
            w.open_table(STATE).map_err(backend)?;
            w.commit().map_err(backend)?;
        }
        tracing::info!(
            target: "storage",
            event = "open",
            path = %path.as_ref().display()
        );
        Ok(Self { db: Arc::new(db) })
    }

    fn write_batch(
        &self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<u64, StateError> {
        let w = self.db.begin_write().map_err(backend)?;
        let mut written = 0u64;
        {
            let mut table = w.open_table(STATE).map_err(backend)?;
            for key in deletes {
                table.remove(key.as_slice()).map_err(backend)?;
            }
            for (key, value) in inserts {
                table
                    .insert(key.as_slice(), value.as_slice())
                    .map_err(backend)?;
                written = written.saturating_add(value.len() as u64);
            }
        }
        w.commit().map_err(backend)?;
        Ok(written)
    }
}

impl StateAccess for RedbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let r = self.db.begin_read().map_err(backend)?;
        let table = r.open_table(STATE).map_err(backend)?;
        let value = table.get(key).map_err(backend)?.map(|v| v.value().to_vec());
        Ok(value)
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.write_batch(&[(key.to_vec(), value.to_vec())], &[])
            .map(|_| ())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.write_batch(&[], &[key.to_vec()]).map(|_| ())
    }

    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        self.write_batch(updates, &[]).map(|_| ())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        let written = self.write_batch(inserts, deletes)?;
        storage_metrics().inc_batches_committed();
        storage_metrics().inc_bytes_written_total(written);
        tracing::debug!(
            target: "storage",
            event = "commit",
            inserts = inserts.len(),
            deletes = deletes.len(),
            bytes = written
        );
        Ok(())
    }

    /// Collects the matching range inside one read transaction, so the scan is
    /// a consistent snapshot even if a write commits while it is consumed.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let r = self.db.begin_read().map_err(backend)?;
        let table = r.open_table(STATE).map_err(backend)?;
        let rows: Vec<StateKVPair> = table
            .range(prefix..)
            .map_err(backend)?
            .take_while(|row| row.as_ref().map_or(true, |(k, _)| k.value().starts_with(prefix)))
            .map(|row| {
                row.map(|(k, v)| (Arc::from(k.value()), Arc::from(v.value())))
                    .map_err(backend)
            })
            .collect::<Result<_, _>>()?;
        Ok(Box::new(rows.into_iter().map(Ok)))
    }
}
