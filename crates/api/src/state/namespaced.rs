// Path: crates/api/src/state/namespaced.rs

//! State access wrappers that confine a service to its own keyspace.

use crate::state::{StateAccess, StateScanIter};
use std::sync::Arc;
use verdant_types::config::ServicePolicy;
use verdant_types::error::StateError;

const SERVICE_DATA_ROOT: &[u8] = b"_service_data::";

/// Helper to generate a canonical namespace prefix for a service.
pub fn service_namespace_prefix(service_id: &str) -> Vec<u8> {
    format!("_service_data::{}::", service_id).into_bytes()
}

/// The key mapping shared by the mutable and read-only wrappers.
///
/// Keys matching an allowlisted `system::` prefix pass through untouched.
/// Every other key is prefixed with `_service_data::{service_id}::`, and raw
/// `_service_data::` keys are refused so one service cannot reach into another.
struct Namespace<'a> {
    service_id: &'a str,
    prefix: Vec<u8>,
    policy: &'a ServicePolicy,
}

impl<'a> Namespace<'a> {
    fn new(service_id: &'a str, policy: &'a ServicePolicy) -> Self {
        Self {
            service_id,
            prefix: service_namespace_prefix(service_id),
            policy,
        }
    }

    fn is_shared(&self, key: &[u8]) -> bool {
        self.policy
            .allowed_system_prefixes
            .iter()
            .any(|p| key.starts_with(p.as_bytes()))
    }

    #[inline]
    fn qualify(&self, key: &[u8]) -> Result<Vec<u8>, StateError> {
        if self.is_shared(key) {
            return Ok(key.to_vec());
        }
        if key.starts_with(SERVICE_DATA_ROOT) || key.starts_with(b"system::") {
            log::warn!(
                "[Namespace] Service '{}' denied access to '{}'",
                self.service_id,
                String::from_utf8_lossy(key)
            );
            return Err(StateError::PermissionDenied(format!(
                "service '{}' may not access key '{}'",
                self.service_id,
                String::from_utf8_lossy(key)
            )));
        }
        Ok([self.prefix.as_slice(), key].concat())
    }

    fn qualify_all(&self, keys: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, StateError> {
        keys.iter().map(|k| self.qualify(k)).collect()
    }

    fn qualify_pairs(
        &self,
        pairs: &[(Vec<u8>, Vec<u8>)],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        pairs
            .iter()
            .map(|(k, v)| self.qualify(k).map(|qk| (qk, v.clone())))
            .collect()
    }

    /// Scans under the qualified prefix and hands back keys relative to the
    /// service's namespace. Shared keys are returned as stored.
    fn scan<'s>(
        &self,
        inner: &'s dyn StateAccess,
        prefix: &[u8],
    ) -> Result<StateScanIter<'s>, StateError> {
        let qualified = self.qualify(prefix)?;
        let iter = inner.prefix_scan(&qualified)?;
        if self.is_shared(prefix) {
            return Ok(iter);
        }
        let strip = self.prefix.len();
        Ok(Box::new(iter.map(move |res| {
            res.map(|(key, value)| {
                let relative: Arc<[u8]> = Arc::from(key.get(strip..).unwrap_or_default());
                (relative, value)
            })
        })))
    }
}

/// A wrapper that provides namespaced, isolated, mutable access to a `StateAccess`.
pub struct NamespacedStateAccess<'a> {
    inner: &'a mut dyn StateAccess,
    ns: Namespace<'a>,
}

impl<'a> NamespacedStateAccess<'a> {
    /// Creates a new namespaced state accessor for a service.
    pub fn new(
        inner: &'a mut dyn StateAccess,
        service_id: &'a str,
        policy: &'a ServicePolicy,
    ) -> Self {
        Self {
            inner,
            ns: Namespace::new(service_id, policy),
        }
    }
}

impl<'a> StateAccess for NamespacedStateAccess<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.inner.get(&self.ns.qualify(key)?)
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        let key = self.ns.qualify(key)?;
        self.inner.insert(&key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        let key = self.ns.qualify(key)?;
        self.inner.delete(&key)
    }

    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        let mapped = self.ns.qualify_pairs(updates)?;
        self.inner.batch_set(&mapped)
    }

    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        self.inner.batch_get(&self.ns.qualify_all(keys)?)
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        let inserts = self.ns.qualify_pairs(inserts)?;
        let deletes = self.ns.qualify_all(deletes)?;
        self.inner.batch_apply(&inserts, &deletes)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        self.ns.scan(&*self.inner, prefix)
    }
}

/// A read-only version of `NamespacedStateAccess`, used for queries.
///
/// Applies the same namespace rules; every write is refused.
pub struct ReadOnlyNamespacedStateAccess<'a> {
    inner: &'a dyn StateAccess,
    ns: Namespace<'a>,
}

impl<'a> ReadOnlyNamespacedStateAccess<'a> {
    /// Creates a new read-only namespaced state accessor.
    pub fn new(inner: &'a dyn StateAccess, service_id: &'a str, policy: &'a ServicePolicy) -> Self {
        Self {
            inner,
            ns: Namespace::new(service_id, policy),
        }
    }

    fn refuse(op: &str) -> StateError {
        StateError::PermissionDenied(format!("{} attempted in read-only query context", op))
    }
}

impl<'a> StateAccess for ReadOnlyNamespacedStateAccess<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.inner.get(&self.ns.qualify(key)?)
    }

    fn insert(&mut self, _key: &[u8], _value: &[u8]) -> Result<(), StateError> {
        Err(Self::refuse("Write"))
    }

    fn delete(&mut self, _key: &[u8]) -> Result<(), StateError> {
        Err(Self::refuse("Delete"))
    }

    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        self.inner.batch_get(&self.ns.qualify_all(keys)?)
    }

    fn batch_apply(
        &mut self,
        _inserts: &[(Vec<u8>, Vec<u8>)],
        _deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        Err(Self::refuse("Batch apply"))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        self.ns.scan(self.inner, prefix)
    }
}
