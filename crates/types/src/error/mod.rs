// Path: crates/types/src/error/mod.rs
//! Core error types for the Verdant verification engine.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors related to the state store.
#[derive(Error, Debug)]
pub enum StateError {
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// The provided value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// An error occurred during state deserialization.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The operation was denied due to insufficient permissions on a state key.
    #[error("Permission denied for state key: {0}")]
    PermissionDenied(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
            Self::PermissionDenied(_) => "STATE_PERMISSION_DENIED",
        }
    }
}

/// Rejections produced by the verification service.
///
/// Every variant is returned before any state is written, so a rejected call
/// leaves the registry and ledger exactly as they were.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    /// The caller does not hold the required role, or the oracle is inactive or
    /// bound to a different identity.
    #[error("Caller is not authorized for this operation")]
    NotAuthorized,
    /// The referenced oracle id was never registered.
    #[error("Oracle not found")]
    OracleNotFound,
    /// An active oracle is already registered for the reporter identity.
    #[error("An active oracle already exists for this reporter")]
    OracleAlreadyExists,
    /// The initiative catalog does not know the initiative.
    #[error("Initiative not found")]
    InitiativeNotFound,
    /// The magnitude lies outside the initiative's bounds.
    #[error("Reported emission reduction is outside the initiative bounds")]
    InvalidEmissionReduction,
    /// The metadata exceeds the configured maximum length.
    #[error("Metadata exceeds the maximum length")]
    InvalidMetadata,
    /// A mutating call was made while the service is paused.
    #[error("Contract is paused")]
    ContractPaused,
    /// The sequence slot is occupied, or the oracle already endorsed the claim.
    #[error("Duplicate submission")]
    DuplicateSubmission,
    /// The claim is missing, the endorsed value differs, or the claim is not
    /// (or no longer) verified.
    #[error("Invalid data")]
    InvalidData,
}

impl ErrorCode for VerificationError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "VERIFY_NOT_AUTHORIZED",
            Self::OracleNotFound => "VERIFY_ORACLE_NOT_FOUND",
            Self::OracleAlreadyExists => "VERIFY_ORACLE_ALREADY_EXISTS",
            Self::InitiativeNotFound => "VERIFY_INITIATIVE_NOT_FOUND",
            Self::InvalidEmissionReduction => "VERIFY_INVALID_EMISSION_REDUCTION",
            Self::InvalidMetadata => "VERIFY_INVALID_METADATA",
            Self::ContractPaused => "VERIFY_CONTRACT_PAUSED",
            Self::DuplicateSubmission => "VERIFY_DUPLICATE_SUBMISSION",
            Self::InvalidData => "VERIFY_INVALID_DATA",
        }
    }
}

/// Errors returned by service calls and queries.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// An error occurred during serialization.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// An error occurred during deserialization.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// The call is invalid for a reason outside the service's own taxonomy.
    #[error("Invalid transaction: {0}")]
    Invalid(String),
    /// An error originating from the verification service.
    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),
    /// An error originating from the state store.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// The addressed service or method does not exist.
    #[error("Unsupported call: {0}")]
    Unsupported(String),
}

impl ErrorCode for TransactionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "TX_SERIALIZATION_ERROR",
            Self::Deserialization(_) => "TX_DESERIALIZATION_ERROR",
            Self::Invalid(_) => "TX_INVALID",
            Self::Verification(e) => e.code(),
            Self::State(_) => "TX_STATE_ERROR",
            Self::Unsupported(_) => "TX_UNSUPPORTED",
        }
    }
}

impl From<String> for TransactionError {
    fn from(s: String) -> Self {
        TransactionError::Invalid(s)
    }
}

impl TransactionError {
    /// Returns the verification rejection carried by this error, if any.
    pub fn as_verification(&self) -> Option<VerificationError> {
        match self {
            Self::Verification(e) => Some(*e),
            _ => None,
        }
    }
}

/// Errors raised by the execution layer while applying a call.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The call was rejected by the addressed service.
    #[error("Transaction failed: {0}")]
    Transaction(#[from] TransactionError),
    /// The supplied block height went backwards.
    #[error("Block height must not decrease. Last applied {last}, got {got}")]
    NonMonotonicHeight {
        /// The height of the last applied call.
        last: u64,
        /// The height supplied with the rejected call.
        got: u64,
    },
    /// No service with the given id is registered.
    #[error("Unknown service: {0}")]
    UnknownService(String),
    /// Committing the call's writes failed.
    #[error("State commit failed: {0}")]
    State(#[from] StateError),
}

impl ErrorCode for ChainError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transaction(e) => e.code(),
            Self::NonMonotonicHeight { .. } => "CHAIN_NON_MONOTONIC_HEIGHT",
            Self::UnknownService(_) => "CHAIN_UNKNOWN_SERVICE",
            Self::State(_) => "CHAIN_STATE_ERROR",
        }
    }
}

impl ChainError {
    /// Returns the verification rejection carried by this error, if any.
    pub fn as_verification(&self) -> Option<VerificationError> {
        match self {
            Self::Transaction(e) => e.as_verification(),
            _ => None,
        }
    }
}

/// A general-purpose error for setup paths such as configuration and genesis.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// An error from the state store.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// A custom error with a message.
    #[error("{0}")]
    Custom(String),
}

impl ErrorCode for CoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CORE_CONFIG_ERROR",
            Self::State(_) => "CORE_STATE_ERROR",
            Self::Custom(_) => "CORE_CUSTOM_ERROR",
        }
    }
}

impl From<String> for CoreError {
    fn from(s: String) -> Self {
        CoreError::Custom(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_codes_surface_through_wrappers() {
        let tx: TransactionError = VerificationError::ContractPaused.into();
        assert_eq!(tx.code(), "VERIFY_CONTRACT_PAUSED");
        let chain: ChainError = tx.into();
        assert_eq!(chain.code(), "VERIFY_CONTRACT_PAUSED");
        assert_eq!(
            chain.as_verification(),
            Some(VerificationError::ContractPaused)
        );
    }

    #[test]
    fn test_non_verification_errors_carry_no_rejection() {
        let chain = ChainError::UnknownService("bank".into());
        assert_eq!(chain.as_verification(), None);
        assert_eq!(chain.code(), "CHAIN_UNKNOWN_SERVICE");
    }

    #[test]
    fn test_state_errors_surface_through_commit_failures() {
        let chain: ChainError = StateError::Backend("disk full".into()).into();
        assert_eq!(chain.code(), "CHAIN_STATE_ERROR");
        assert_eq!(
            StateError::PermissionDenied("system::status".into()).code(),
            "STATE_PERMISSION_DENIED"
        );
        let core: CoreError = StateError::Decode("truncated".into()).into();
        assert_eq!(core.code(), "CORE_STATE_ERROR");
    }
}
