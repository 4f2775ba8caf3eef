// Path: crates/execution/src/app/view.rs
use super::ExecutionMachine;
use verdant_api::state::ReadOnlyNamespacedStateAccess;
use verdant_api::transaction::context::TxContext;
use verdant_telemetry::service_metrics;
use verdant_telemetry::time::DispatchTimer;
use verdant_types::error::{ChainError, ErrorCode};

impl ExecutionMachine {
    /// Runs a read-only query against the latest committed state, at the
    /// height of the last applied call.
    pub async fn query(
        &self,
        service_id: &str,
        method: &str,
        params: &[u8],
    ) -> Result<Vec<u8>, ChainError> {
        self.query_inner(None, service_id, method, params).await
    }

    /// Runs a read-only query as if the clock read `height`.
    ///
    /// `height` may look ahead of the last applied call but never behind it,
    /// so an expired claim cannot be read back as valid. Nothing is
    /// committed, so this does not move the machine's clock.
    pub async fn query_at(
        &self,
        height: u64,
        service_id: &str,
        method: &str,
        params: &[u8],
    ) -> Result<Vec<u8>, ChainError> {
        self.query_inner(Some(height), service_id, method, params)
            .await
    }

    async fn query_inner(
        &self,
        height: Option<u64>,
        service_id: &str,
        method: &str,
        params: &[u8],
    ) -> Result<Vec<u8>, ChainError> {
        let service = self.service(service_id)?;
        let policy = self.policy_for(service_id);

        let guard = self.state.read().await;
        let height = match height {
            Some(h) if h < guard.last_height => {
                return Err(ChainError::NonMonotonicHeight {
                    last: guard.last_height,
                    got: h,
                });
            }
            Some(h) => h,
            None => guard.last_height,
        };
        let _timer = DispatchTimer::start(service_metrics(), service_id, method);
        let ctx = TxContext::for_query(height, &self.services);
        let view = ReadOnlyNamespacedStateAccess::new(&*guard.store, service_id, &policy);

        service
            .handle_service_query(&view, method, params, &ctx)
            .map_err(|e| {
                service_metrics().inc_dispatch_error(service_id, method, e.code());
                tracing::debug!(
                    target: "execution",
                    event = "query_failed",
                    service = service_id,
                    method,
                    code = e.code()
                );
                ChainError::Transaction(e)
            })
    }
}
