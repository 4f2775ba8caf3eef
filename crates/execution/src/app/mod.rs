// Path: crates/execution/src/app/mod.rs
mod dispatch;
mod view;

use crate::genesis::apply_genesis;
use parity_scale_codec::Decode;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::RwLock;
use verdant_api::services::access::ServiceDirectory;
use verdant_api::services::BlockchainService;
use verdant_api::state::{read_record, StateAccess};
use verdant_services::initiatives::StaticInitiativeCatalog;
use verdant_services::verification::VerificationService;
use verdant_types::app::VerificationEvent;
use verdant_types::codec;
use verdant_types::config::{ServicePolicy, VerdantConfig};
use verdant_types::error::{CoreError, TransactionError};
use verdant_types::keys::STATUS_KEY;

/// The outcome of a successfully applied call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// The block height the call was applied at.
    pub height: u64,
    /// The SCALE-encoded return value of the service method.
    pub output: Vec<u8>,
    /// Events emitted by the call, in emission order.
    pub events: Vec<VerificationEvent>,
}

impl Receipt {
    /// Decodes the method's return value.
    pub fn decode_output<T: Decode>(&self) -> Result<T, TransactionError> {
        codec::from_bytes_canonical(&self.output).map_err(TransactionError::Deserialization)
    }
}

/// Committed state plus the height of the last applied call. Only ever
/// touched under the machine's lock.
struct CommittedState {
    store: Box<dyn StateAccess>,
    last_height: u64,
}

/// The single-writer state machine that dispatches calls to services.
///
/// # State Isolation Enforcement
///
/// Every dispatch wraps the committed state in a `NamespacedStateAccess` (or
/// its read-only variant for queries) built from the service's
/// `ServicePolicy`, so a service can only reach its own keys and the shared
/// prefixes it is allowlisted for.
///
/// # Serialization
///
/// Calls take the write half of a `tokio::sync::RwLock` for their whole
/// duration, so no two calls interleave. Queries take the read half and may
/// run concurrently with each other.
pub struct ExecutionMachine {
    state: RwLock<CommittedState>,
    services: ServiceDirectory,
    service_policies: BTreeMap<String, ServicePolicy>,
}

impl Debug for ExecutionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionMachine")
            .field("services", &self.services)
            .field("service_policies", &self.service_policies)
            .finish_non_exhaustive()
    }
}

impl ExecutionMachine {
    /// Creates a machine over an already initialized store.
    ///
    /// The last applied height is restored from the store, so a reopened
    /// durable backend keeps rejecting heights older than its last call.
    pub fn new(
        store: Box<dyn StateAccess>,
        services: Vec<Arc<dyn BlockchainService>>,
        service_policies: BTreeMap<String, ServicePolicy>,
    ) -> Result<Self, CoreError> {
        let last_height: u64 = read_record(&*store, STATUS_KEY)?.unwrap_or(0);
        let services = ServiceDirectory::new(services);
        tracing::info!(
            target: "execution",
            event = "machine_ready",
            last_height,
            services = ?services
        );
        Ok(Self {
            state: RwLock::new(CommittedState { store, last_height }),
            services,
            service_policies,
        })
    }

    /// Validates `config`, applies genesis if `store` is empty and wires the
    /// standard service set: the verification service and the static
    /// initiative catalog.
    pub fn from_config(
        mut store: Box<dyn StateAccess>,
        config: &VerdantConfig,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        apply_genesis(&mut *store, config)?;
        let services: Vec<Arc<dyn BlockchainService>> = vec![
            Arc::new(VerificationService::new(config.verification.clone())),
            Arc::new(StaticInitiativeCatalog),
        ];
        Self::new(store, services, config.service_policies.clone())
    }

    /// The services this machine dispatches to.
    pub fn services(&self) -> &ServiceDirectory {
        &self.services
    }

    /// The height of the last applied call, or 0 before the first one.
    pub async fn last_height(&self) -> u64 {
        self.state.read().await.last_height
    }

    fn policy_for(&self, service_id: &str) -> ServicePolicy {
        self.service_policies
            .get(service_id)
            .cloned()
            .unwrap_or_default()
    }
}
