// Path: crates/api/src/state/mod.rs
//! Core traits and adapters for key-value state access.
//!
//! - `StateAccess`: the dyn-safe key-value interface every backend implements.
//! - `StateOverlay`: a copy-on-write write set used to make each call atomic.
//! - `NamespacedStateAccess`: confines a service to its own keyspace.

use std::sync::Arc;
use verdant_types::error::StateError;

/// An atomically reference-counted, owned key slice.
pub type StateKey = Arc<[u8]>;
/// An atomically reference-counted, owned value slice.
pub type StateVal = Arc<[u8]>;
/// An owned key-value pair from the state, using cheap-to-clone Arcs.
pub type StateKVPair = (StateKey, StateVal);
/// A streaming iterator over key-value pairs from the state, in ascending key order.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + Send + 'a>;

mod accessor;
pub mod namespaced;
mod overlay;

pub use accessor::*;
pub use namespaced::{service_namespace_prefix, NamespacedStateAccess, ReadOnlyNamespacedStateAccess};
pub use overlay::*;

/// Returns the smallest key strictly greater than every key starting with
/// `prefix`, or `None` if no such key exists (empty or all-`0xFF` prefix).
pub fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let last_incrementable = prefix.iter().rposition(|b| *b != 0xFF)?;
    let mut bound = prefix.get(..=last_incrementable)?.to_vec();
    if let Some(byte) = bound.last_mut() {
        *byte += 1;
    }
    Some(bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_upper_bound() {
        assert_eq!(prefix_upper_bound(b"ab"), Some(b"ac".to_vec()));
        assert_eq!(prefix_upper_bound(&[0x01, 0xFF]), Some(vec![0x02]));
        assert_eq!(prefix_upper_bound(&[0xFF, 0xFF]), None);
        assert_eq!(prefix_upper_bound(b""), None);
    }
}
