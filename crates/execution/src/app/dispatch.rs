// Path: crates/execution/src/app/dispatch.rs
use super::{ExecutionMachine, Receipt};
use std::sync::Arc;
use verdant_api::services::BlockchainService;
use verdant_api::state::{
    NamespacedStateAccess, ReadOnlyNamespacedStateAccess, StateAccess, StateOverlay,
};
use verdant_api::transaction::context::TxContext;
use verdant_services::verification;
use verdant_telemetry::time::DispatchTimer;
use verdant_telemetry::{error_metrics, service_metrics, verification_metrics};
use verdant_types::app::{AccountId, VerificationEvent};
use verdant_types::codec;
use verdant_types::error::{ChainError, ErrorCode, TransactionError};
use verdant_types::keys::STATUS_KEY;

impl ExecutionMachine {
    pub(super) fn service(&self, service_id: &str) -> Result<Arc<dyn BlockchainService>, ChainError> {
        self.services
            .get_by_id(service_id)
            .cloned()
            .ok_or_else(|| ChainError::UnknownService(service_id.to_string()))
    }

    /// Applies one signed call at `height`.
    ///
    /// The service runs against an overlay of the committed state. On success
    /// the overlay's writes and the new height are committed in one batch; on
    /// failure the overlay is dropped and nothing is written.
    pub async fn apply(
        &self,
        height: u64,
        signer: AccountId,
        service_id: &str,
        method: &str,
        params: &[u8],
    ) -> Result<Receipt, ChainError> {
        let service = self.service(service_id)?;
        let policy = self.policy_for(service_id);

        let mut guard = self.state.write().await;
        if height < guard.last_height {
            return Err(ChainError::NonMonotonicHeight {
                last: guard.last_height,
                got: height,
            });
        }

        let _timer = DispatchTimer::start(service_metrics(), service_id, method);
        let mut ctx = TxContext::new(height, signer, &self.services);
        let outcome = {
            let mut overlay = StateOverlay::new(&*guard.store);
            let result = {
                let mut namespaced = NamespacedStateAccess::new(&mut overlay, service_id, &policy);
                service
                    .handle_service_call(&mut namespaced, method, params, &mut ctx)
                    .await
            };
            result.map(|output| (output, overlay.into_ordered_batch()))
        };

        let (output, (mut inserts, deletes)) = match outcome {
            Ok(ok) => ok,
            Err(e) => {
                service_metrics().inc_dispatch_error(service_id, method, e.code());
                error_metrics().inc_error("transaction", e.code());
                tracing::warn!(
                    target: "execution",
                    event = "call_rejected",
                    service = service_id,
                    method,
                    height,
                    signer = %signer,
                    code = e.code(),
                    error = %e
                );
                return Err(ChainError::Transaction(e));
            }
        };

        let status = codec::to_bytes_canonical(&height).map_err(TransactionError::Serialization)?;
        inserts.push((STATUS_KEY.to_vec(), status));
        guard.store.batch_apply(&inserts, &deletes).map_err(|e| {
            error_metrics().inc_error("state", e.code());
            ChainError::State(e)
        })?;
        guard.last_height = height;
        self.record_committed(&*guard.store, &ctx.events);

        tracing::info!(
            target: "execution",
            event = "call_applied",
            service = service_id,
            method,
            height,
            writes = inserts.len() + deletes.len(),
            events = ctx.events.len()
        );
        Ok(Receipt {
            height,
            output,
            events: ctx.events,
        })
    }

    /// Updates the verification metrics from the events of a committed call.
    fn record_committed(&self, store: &dyn StateAccess, events: &[VerificationEvent]) {
        let metrics = verification_metrics();
        let mut registry_changed = false;
        for event in events {
            match event {
                VerificationEvent::SubmissionRecorded { .. } => metrics.inc_submissions(),
                VerificationEvent::EndorsementAdded { .. } => metrics.inc_endorsements(),
                VerificationEvent::ConsensusReached { .. } => metrics.inc_consensus_reached(),
                VerificationEvent::OracleAdded { .. } | VerificationEvent::OracleRemoved { .. } => {
                    registry_changed = true
                }
                _ => {}
            }
        }
        if !registry_changed {
            return;
        }

        let policy = self.policy_for(verification::SERVICE_ID);
        let view = ReadOnlyNamespacedStateAccess::new(store, verification::SERVICE_ID, &policy);
        match verification::active_oracle_count(&view) {
            Ok(count) => metrics.set_active_oracles(count),
            Err(e) => tracing::warn!(
                target: "execution",
                event = "metrics_refresh_failed",
                error = %e
            ),
        }
    }

    /// Moves the clock forward without applying a call.
    ///
    /// Used to let time-dependent reads, such as claim expiry, observe a later
    /// height.
    pub async fn advance_to(&self, height: u64) -> Result<(), ChainError> {
        let mut guard = self.state.write().await;
        if height < guard.last_height {
            return Err(ChainError::NonMonotonicHeight {
                last: guard.last_height,
                got: height,
            });
        }
        let status = codec::to_bytes_canonical(&height).map_err(TransactionError::Serialization)?;
        guard.store.batch_apply(&[(STATUS_KEY.to_vec(), status)], &[])?;
        guard.last_height = height;
        tracing::debug!(target: "execution", event = "height_advanced", height);
        Ok(())
    }
}
