// Path: crates/api/src/services/access.rs

//! Read-only access to registered services.

use crate::initiative::InitiativeCatalog;
use crate::services::BlockchainService;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A read-only service locator.
///
/// Services are held in lexicographic `id()` order, so iteration is the same
/// on every node regardless of registration order.
#[derive(Clone, Default)]
pub struct ServiceDirectory {
    by_id: Arc<BTreeMap<String, Arc<dyn BlockchainService>>>,
}

impl fmt::Debug for ServiceDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDirectory")
            .field("services", &self.by_id.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ServiceDirectory {
    /// Creates a new directory from a list of services.
    /// A later service with the same id replaces an earlier one.
    pub fn new(services: Vec<Arc<dyn BlockchainService>>) -> Self {
        let by_id = services
            .into_iter()
            .map(|s| (s.id().to_string(), s))
            .collect();
        Self {
            by_id: Arc::new(by_id),
        }
    }

    /// Looks up a service by its dispatch id.
    pub fn get_by_id(&self, id: &str) -> Option<&Arc<dyn BlockchainService>> {
        self.by_id.get(id)
    }

    /// Gets a service by its concrete type.
    pub fn get<T: BlockchainService>(&self) -> Option<&T> {
        self.by_id
            .values()
            .find_map(|svc| svc.as_any().downcast_ref::<T>())
    }

    /// Returns a deterministically ordered iterator over all stored services.
    pub fn services(&self) -> impl Iterator<Item = &Arc<dyn BlockchainService>> {
        self.by_id.values()
    }

    /// Returns the first registered service exposing the initiative catalog capability.
    pub fn initiative_catalog(&self) -> Option<&dyn InitiativeCatalog> {
        self.services().find_map(|s| s.as_initiative_catalog())
    }
}
