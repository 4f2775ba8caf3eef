// Path: crates/api/src/transaction/context.rs
//! Defines the stable context for transaction execution.

use crate::services::access::ServiceDirectory;
use verdant_types::app::{AccountId, VerificationEvent};

/// Provides per-call context to services during execution.
///
/// Everything except `events` is read-only from the service's point of view.
/// Services append to `events` as they commit effects; the execution layer
/// discards them if the call fails.
#[derive(Clone)]
pub struct TxContext<'a> {
    /// The block height of the call. This is the engine's only time source and
    /// never decreases between applied calls.
    pub block_height: u64,
    /// The `AccountId` of the entity that signed the current call.
    /// This is the authoritative source for permission checks within services.
    pub signer_account_id: AccountId,
    /// A read-only directory of available services.
    pub services: &'a ServiceDirectory,
    /// If true, the call is a read-only query and has no permanent side effects.
    pub simulation: bool,
    /// If true, the call is initiated by the node itself (e.g. genesis) rather
    /// than by a signed request.
    pub is_internal: bool,
    /// Events emitted so far by the current call.
    pub events: Vec<VerificationEvent>,
}

impl<'a> TxContext<'a> {
    /// Creates a context for a signed, state-mutating call.
    pub fn new(block_height: u64, signer_account_id: AccountId, services: &'a ServiceDirectory) -> Self {
        Self {
            block_height,
            signer_account_id,
            services,
            simulation: false,
            is_internal: false,
            events: Vec::new(),
        }
    }

    /// Creates a context for a read-only query.
    pub fn for_query(block_height: u64, services: &'a ServiceDirectory) -> Self {
        Self {
            simulation: true,
            ..Self::new(block_height, AccountId::default(), services)
        }
    }

    /// Records an event for the current call.
    pub fn emit(&mut self, event: VerificationEvent) {
        self.events.push(event);
    }
}
