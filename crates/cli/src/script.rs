// Path: crates/cli/src/script.rs
//! Replay scripts: a JSON list of signed calls, queries and clock moves
//! applied in order to a single engine.
//!
//! ```json
//! {
//!   "steps": [
//!     { "height": 1, "signer": "d0d0...", "call": { "method": "add_oracle", "reporter": "a1a1...", "name": "field auditor" } },
//!     { "query": { "method": "list_oracles" } },
//!     { "advance_to": 1500 },
//!     { "query": { "method": "get_verified_magnitude", "subject": "0101...", "initiative_id": 1, "submission_id": 1 }, "at": 1400 }
//!   ]
//! }
//! ```

use crate::client::{Call, Query, VerificationClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use verdant_types::app::{AccountId, VerificationEvent};
use verdant_types::error::{ChainError, ErrorCode};

/// A parsed replay script.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Script {
    pub steps: Vec<Step>,
}

/// One step of a script.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Step {
    /// Apply `call` as `signer` at `height`.
    Call {
        height: u64,
        signer: AccountId,
        call: Call,
    },
    /// Run `query` at the last applied height, or at `at`.
    Query {
        query: Query,
        #[serde(default)]
        at: Option<u64>,
    },
    /// Move the clock forward without a call.
    AdvanceTo { advance_to: u64 },
}

/// What happened to one step.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Applied {
        height: u64,
        method: &'static str,
        output: Value,
        events: Vec<VerificationEvent>,
    },
    Answered {
        height: u64,
        method: &'static str,
        result: Value,
    },
    Advanced {
        height: u64,
    },
    Rejected {
        height: u64,
        method: &'static str,
        code: &'static str,
        error: String,
    },
}

impl StepOutcome {
    fn rejected(height: u64, method: &'static str, err: &ChainError) -> Self {
        Self::Rejected {
            height,
            method,
            code: err.code(),
            error: err.to_string(),
        }
    }

    /// Returns true if the step was refused by the engine.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Runs every step of `script` against `client`, in order.
///
/// A rejected step is recorded and the replay continues. Only a failure to
/// render a successful result back into JSON aborts the run.
pub async fn replay(
    client: &VerificationClient,
    script: &Script,
) -> Result<Vec<StepOutcome>, ChainError> {
    let mut outcomes = Vec::with_capacity(script.steps.len());
    for step in &script.steps {
        let outcome = match step {
            Step::Call {
                height,
                signer,
                call,
            } => match client.call(*height, *signer, call).await {
                Ok(receipt) => StepOutcome::Applied {
                    height: receipt.height,
                    method: call.method(),
                    output: call.render_output(&receipt)?,
                    events: receipt.events,
                },
                Err(e) => StepOutcome::rejected(*height, call.method(), &e),
            },
            Step::Query { query, at } => {
                let height = match at {
                    Some(h) => *h,
                    None => client.machine().last_height().await,
                };
                match client.query_raw(*at, query).await {
                    Ok(raw) => StepOutcome::Answered {
                        height,
                        method: query.method(),
                        result: query.render_output(&raw)?,
                    },
                    Err(e) => StepOutcome::rejected(height, query.method(), &e),
                }
            }
            Step::AdvanceTo { advance_to } => match client.machine().advance_to(*advance_to).await {
                Ok(()) => StepOutcome::Advanced {
                    height: *advance_to,
                },
                Err(e) => StepOutcome::rejected(*advance_to, "advance_to", &e),
            },
        };
        tracing::debug!(target: "replay", outcome = ?outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
