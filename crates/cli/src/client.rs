// Path: crates/cli/src/client.rs
//! A typed facade over the execution machine for the verification service.

use parity_scale_codec::Decode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use verdant_execution::{ExecutionMachine, Receipt};
use verdant_services::verification::{
    AddEndorsementParams, AddOracleParams, OracleIdParams, ReporterParams, SubmissionPairParams,
    SubmissionRef, SubmitParams, TransferAdminParams, TransferOwnershipParams,
    UpdateReputationParams, SERVICE_ID,
};
use verdant_types::app::{AccountId, AdminState, Oracle, Submission};
use verdant_types::codec;
use verdant_types::error::{ChainError, TransactionError};

/// A state-changing call on the verification service.
///
/// The serde form is internally tagged by `method`, with the parameters
/// inlined next to it, e.g. `{"method": "remove_oracle", "oracle_id": 2}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Call {
    AddOracle(AddOracleParams),
    RemoveOracle(OracleIdParams),
    UpdateReputation(UpdateReputationParams),
    TransferAdmin(TransferAdminParams),
    TransferOwnership(TransferOwnershipParams),
    Pause,
    Unpause,
    Submit(SubmitParams),
    AddEndorsement(AddEndorsementParams),
}

impl Call {
    /// The versioned dispatch name of the call.
    pub fn method(&self) -> &'static str {
        match self {
            Self::AddOracle(_) => "add_oracle@v1",
            Self::RemoveOracle(_) => "remove_oracle@v1",
            Self::UpdateReputation(_) => "update_reputation@v1",
            Self::TransferAdmin(_) => "transfer_admin@v1",
            Self::TransferOwnership(_) => "transfer_ownership@v1",
            Self::Pause => "pause@v1",
            Self::Unpause => "unpause@v1",
            Self::Submit(_) => "submit@v1",
            Self::AddEndorsement(_) => "add_endorsement@v1",
        }
    }

    fn encode_params(&self) -> Result<Vec<u8>, TransactionError> {
        let bytes = match self {
            Self::AddOracle(p) => codec::to_bytes_canonical(p),
            Self::RemoveOracle(p) => codec::to_bytes_canonical(p),
            Self::UpdateReputation(p) => codec::to_bytes_canonical(p),
            Self::TransferAdmin(p) => codec::to_bytes_canonical(p),
            Self::TransferOwnership(p) => codec::to_bytes_canonical(p),
            Self::Pause | Self::Unpause => Ok(Vec::new()),
            Self::Submit(p) => codec::to_bytes_canonical(p),
            Self::AddEndorsement(p) => codec::to_bytes_canonical(p),
        };
        bytes.map_err(TransactionError::Serialization)
    }

    /// Decodes a receipt's output into JSON according to the call's return type.
    pub fn render_output(&self, receipt: &Receipt) -> Result<Value, TransactionError> {
        match self {
            Self::AddOracle(_) => to_json(&receipt.decode_output::<u64>()?),
            Self::RemoveOracle(_)
            | Self::UpdateReputation(_)
            | Self::Submit(_)
            | Self::AddEndorsement(_) => to_json(&receipt.decode_output::<bool>()?),
            Self::TransferAdmin(_)
            | Self::TransferOwnership(_)
            | Self::Pause
            | Self::Unpause => Ok(Value::Null),
        }
    }
}

/// A read-only query on the verification service, tagged like [`Call`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Query {
    GetOracle(OracleIdParams),
    GetOracleByReporter(ReporterParams),
    ListOracles,
    GetSubmission(SubmissionRef),
    ListSubmissions(SubmissionPairParams),
    GetSubmissionCount(SubmissionPairParams),
    GetVerifiedMagnitude(SubmissionRef),
    IsPaused,
    GetAdminState,
}

impl Query {
    /// The versioned dispatch name of the query.
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetOracle(_) => "get_oracle@v1",
            Self::GetOracleByReporter(_) => "get_oracle_by_reporter@v1",
            Self::ListOracles => "list_oracles@v1",
            Self::GetSubmission(_) => "get_submission@v1",
            Self::ListSubmissions(_) => "list_submissions@v1",
            Self::GetSubmissionCount(_) => "get_submission_count@v1",
            Self::GetVerifiedMagnitude(_) => "get_verified_magnitude@v1",
            Self::IsPaused => "is_paused@v1",
            Self::GetAdminState => "get_admin_state@v1",
        }
    }

    fn encode_params(&self) -> Result<Vec<u8>, TransactionError> {
        let bytes = match self {
            Self::GetOracle(p) => codec::to_bytes_canonical(p),
            Self::GetOracleByReporter(p) => codec::to_bytes_canonical(p),
            Self::GetSubmission(p) | Self::GetVerifiedMagnitude(p) => codec::to_bytes_canonical(p),
            Self::ListSubmissions(p) | Self::GetSubmissionCount(p) => codec::to_bytes_canonical(p),
            Self::ListOracles | Self::IsPaused | Self::GetAdminState => Ok(Vec::new()),
        };
        bytes.map_err(TransactionError::Serialization)
    }

    /// Decodes a raw query result into JSON according to the query's return type.
    pub fn render_output(&self, raw: &[u8]) -> Result<Value, TransactionError> {
        match self {
            Self::GetOracle(_) | Self::GetOracleByReporter(_) => {
                to_json(&decode::<Option<Oracle>>(raw)?)
            }
            Self::ListOracles => to_json(&decode::<Vec<Oracle>>(raw)?),
            Self::GetSubmission(_) => to_json(&decode::<Option<Submission>>(raw)?),
            Self::ListSubmissions(_) => to_json(&decode::<Vec<(u64, Submission)>>(raw)?),
            Self::GetSubmissionCount(_) | Self::GetVerifiedMagnitude(_) => {
                to_json(&decode::<u64>(raw)?)
            }
            Self::IsPaused => to_json(&decode::<bool>(raw)?),
            Self::GetAdminState => to_json(&decode::<AdminState>(raw)?),
        }
    }
}

fn decode<T: Decode>(raw: &[u8]) -> Result<T, TransactionError> {
    codec::from_bytes_canonical(raw).map_err(TransactionError::Deserialization)
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, TransactionError> {
    serde_json::to_value(value).map_err(|e| TransactionError::Serialization(e.to_string()))
}

/// Drives the verification service of an in-process [`ExecutionMachine`].
#[derive(Debug)]
pub struct VerificationClient {
    machine: ExecutionMachine,
}

impl VerificationClient {
    pub fn new(machine: ExecutionMachine) -> Self {
        Self { machine }
    }

    /// The underlying machine.
    pub fn machine(&self) -> &ExecutionMachine {
        &self.machine
    }

    /// Applies `call` as `signer` at `height`.
    pub async fn call(
        &self,
        height: u64,
        signer: AccountId,
        call: &Call,
    ) -> Result<Receipt, ChainError> {
        let params = call.encode_params()?;
        self.machine
            .apply(height, signer, SERVICE_ID, call.method(), &params)
            .await
    }

    /// Runs `query` at the last applied height, or at `at` when given.
    /// An `at` below the last applied height is refused.
    pub async fn query_raw(&self, at: Option<u64>, query: &Query) -> Result<Vec<u8>, ChainError> {
        let params = query.encode_params()?;
        match at {
            Some(height) => {
                self.machine
                    .query_at(height, SERVICE_ID, query.method(), &params)
                    .await
            }
            None => self.machine.query(SERVICE_ID, query.method(), &params).await,
        }
    }

    async fn query<T: Decode>(&self, at: Option<u64>, query: &Query) -> Result<T, ChainError> {
        let raw = self.query_raw(at, query).await?;
        Ok(decode(&raw)?)
    }

    pub async fn add_oracle(
        &self,
        height: u64,
        signer: AccountId,
        reporter: AccountId,
        name: &str,
    ) -> Result<u64, ChainError> {
        let call = Call::AddOracle(AddOracleParams {
            reporter,
            name: name.to_string(),
            description: String::new(),
        });
        Ok(self.call(height, signer, &call).await?.decode_output()?)
    }

    /// Records a claim and returns whether it finalized on the spot.
    pub async fn submit(
        &self,
        height: u64,
        signer: AccountId,
        params: SubmitParams,
    ) -> Result<bool, ChainError> {
        Ok(self
            .call(height, signer, &Call::Submit(params))
            .await?
            .decode_output()?)
    }

    /// Endorses a claim and returns its consensus flag afterwards.
    pub async fn add_endorsement(
        &self,
        height: u64,
        signer: AccountId,
        params: AddEndorsementParams,
    ) -> Result<bool, ChainError> {
        Ok(self
            .call(height, signer, &Call::AddEndorsement(params))
            .await?
            .decode_output()?)
    }

    pub async fn oracle(&self, oracle_id: u64) -> Result<Option<Oracle>, ChainError> {
        self.query(None, &Query::GetOracle(OracleIdParams { oracle_id }))
            .await
    }

    pub async fn submission(&self, claim: SubmissionRef) -> Result<Option<Submission>, ChainError> {
        self.query(None, &Query::GetSubmission(claim)).await
    }

    /// The agreed magnitude of a finalized claim that is still valid at
    /// `at`, or at the last applied height. `at` may not precede the last
    /// applied height.
    pub async fn verified_magnitude(
        &self,
        claim: SubmissionRef,
        at: Option<u64>,
    ) -> Result<u64, ChainError> {
        self.query(at, &Query::GetVerifiedMagnitude(claim)).await
    }

    pub async fn is_paused(&self) -> Result<bool, ChainError> {
        self.query(None, &Query::IsPaused).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_json_form_inlines_params() {
        let call: Call = serde_json::from_value(json!({
            "method": "remove_oracle",
            "oracle_id": 2
        }))
        .unwrap();
        assert_eq!(call, Call::RemoveOracle(OracleIdParams { oracle_id: 2 }));
        assert_eq!(call.method(), "remove_oracle@v1");

        let pause: Call = serde_json::from_value(json!({ "method": "pause" })).unwrap();
        assert_eq!(pause, Call::Pause);
        assert!(pause.encode_params().unwrap().is_empty());
    }

    #[test]
    fn test_submit_metadata_is_optional() {
        let call: Call = serde_json::from_value(json!({
            "method": "submit",
            "subject": "01".repeat(32),
            "initiative_id": 1,
            "magnitude": 500,
            "oracle_id": 1
        }))
        .unwrap();
        match call {
            Call::Submit(p) => {
                assert_eq!(p.subject, AccountId([1; 32]));
                assert!(p.metadata.is_empty());
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        assert!(serde_json::from_value::<Call>(json!({ "method": "mint" })).is_err());
        assert!(serde_json::from_value::<Query>(json!({ "method": "submit" })).is_err());
    }
}
