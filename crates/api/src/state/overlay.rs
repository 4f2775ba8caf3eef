// Path: crates/api/src/state/overlay.rs

//! A copy-on-write state overlay that makes each call all-or-nothing.

use crate::state::{prefix_upper_bound, StateAccess, StateKVPair, StateScanIter};
use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::{Fuse, Peekable};
use std::ops::Bound;
use std::sync::Arc;
use verdant_types::error::StateError;

/// A batch of key-value pairs to be inserted or updated in the state.
pub type StateInserts = Vec<(Vec<u8>, Vec<u8>)>;

/// A batch of keys to be deleted from the state.
pub type StateDeletes = Vec<Vec<u8>>;

/// A complete set of state changes (inserts/updates and deletes) from a call.
pub type StateChangeSet = (StateInserts, StateDeletes);

/// A pending write: `Some` for an insert, `None` for a tombstone.
type PendingWrite = Option<Vec<u8>>;

/// Merges a base scan with the overlay's pending writes in key order.
/// Pending writes shadow base entries with the same key; tombstones hide them.
struct MergedScan<'a> {
    base: Peekable<Fuse<StateScanIter<'a>>>,
    pending: Peekable<btree_map::Range<'a, Vec<u8>, PendingWrite>>,
}

impl<'a> MergedScan<'a> {
    fn next_order(&mut self) -> Option<Ordering> {
        let pending_key = self.pending.peek().map(|(k, _)| k.as_slice());
        match self.base.peek() {
            // Surface base errors immediately.
            Some(Err(_)) => Some(Ordering::Less),
            Some(Ok((base_key, _))) => Some(match pending_key {
                Some(pk) => base_key.as_ref().cmp(pk),
                None => Ordering::Less,
            }),
            None => pending_key.map(|_| Ordering::Greater),
        }
    }
}

impl<'a> Iterator for MergedScan<'a> {
    type Item = Result<StateKVPair, StateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_order()? {
                Ordering::Less => return self.base.next(),
                Ordering::Equal => {
                    self.base.next();
                }
                Ordering::Greater => {}
            }
            // The pending write wins; skip it if it is a tombstone.
            if let Some((key, Some(value))) = self.pending.next() {
                return Some(Ok((Arc::from(key.as_slice()), Arc::from(value.as_slice()))));
            }
        }
    }
}

/// An in-memory, copy-on-write overlay for any `StateAccess`.
///
/// Reads consult the pending write set first and fall through to `base`.
/// Writes never reach `base`; the execution layer either commits the ordered
/// change set or drops the overlay, so a failed call leaves no trace.
#[derive(Clone)]
pub struct StateOverlay<'a> {
    base: &'a dyn StateAccess,
    pending: BTreeMap<Vec<u8>, PendingWrite>,
}

impl<'a> StateOverlay<'a> {
    /// Creates a new, empty overlay on top of a base state accessor.
    pub fn new(base: &'a dyn StateAccess) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    /// Returns true if no writes have been recorded.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Consumes the overlay and returns its writes in ascending key order.
    pub fn into_ordered_batch(self) -> StateChangeSet {
        let mut inserts = Vec::new();
        let mut deletes = Vec::new();
        for (key, write) in self.pending {
            match write {
                Some(value) => inserts.push((key, value)),
                None => deletes.push(key),
            }
        }
        (inserts, deletes)
    }
}

impl<'a> StateAccess for StateOverlay<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.pending.get(key) {
            Some(write) => Ok(write.clone()),
            None => self.base.get(key),
        }
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.delete(key)?;
        }
        for (key, value) in inserts {
            self.insert(key, value)?;
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let base = self.base.prefix_scan(prefix)?.fuse().peekable();
        let upper = match prefix_upper_bound(prefix) {
            Some(ub) => Bound::Excluded(ub),
            None => Bound::Unbounded,
        };
        let pending = self
            .pending
            .range((Bound::Included(prefix.to_vec()), upper))
            .peekable();
        Ok(Box::new(MergedScan { base, pending }))
    }
}
