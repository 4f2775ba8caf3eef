// Path: crates/cli/src/commands/query.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use verdant_api::state::StateAccess;
use verdant_cli::Query;
use verdant_services::verification::{OracleIdParams, ReporterParams, SubmissionPairParams, SubmissionRef};
use verdant_types::app::AccountId;

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// The node configuration naming the state file to read.
    #[clap(long, default_value = "verdant.toml")]
    pub config: PathBuf,

    /// Evaluate time-dependent reads as of this later height instead of the last applied one.
    #[clap(long)]
    pub at: Option<u64>,

    #[clap(subcommand)]
    pub command: QueryCommands,
}

#[derive(Subcommand, Debug)]
pub enum QueryCommands {
    /// Show the last applied height.
    Status,
    /// Show the owner, admin, pause flag and next oracle id.
    Admin,
    /// List every registered oracle.
    Oracles,
    /// Look up one oracle by id.
    Oracle { oracle_id: u64 },
    /// Look up the active oracle of a reporter.
    Reporter { reporter: AccountId },
    /// List the claims about a subject under an initiative.
    Submissions { subject: AccountId, initiative_id: u64 },
    /// Show one claim.
    Submission {
        subject: AccountId,
        initiative_id: u64,
        submission_id: u64,
    },
    /// Show the verified magnitude of a finalized, unexpired claim.
    Verified {
        subject: AccountId,
        initiative_id: u64,
        submission_id: u64,
    },
    /// Read a raw state key (hex).
    State { key: String },
}

pub async fn run(args: QueryArgs) -> Result<()> {
    let config = verdant_cli::load_config(&args.config)?;

    if let QueryCommands::State { key } = &args.command {
        let key_bytes = hex::decode(key.trim_start_matches("0x")).context("Invalid hex key")?;
        let store = verdant_cli::open_store(&config.node)?;
        match store.get(&key_bytes)? {
            Some(value) => println!("Value (Hex): {}", hex::encode(value)),
            None => println!("Key not found."),
        }
        return Ok(());
    }

    let client = verdant_cli::connect(&config)?;
    let query = match args.command {
        QueryCommands::Status => {
            println!("Height: {}", client.machine().last_height().await);
            return Ok(());
        }
        QueryCommands::Admin => Query::GetAdminState,
        QueryCommands::Oracles => Query::ListOracles,
        QueryCommands::Oracle { oracle_id } => Query::GetOracle(OracleIdParams { oracle_id }),
        QueryCommands::Reporter { reporter } => {
            Query::GetOracleByReporter(ReporterParams { reporter })
        }
        QueryCommands::Submissions {
            subject,
            initiative_id,
        } => Query::ListSubmissions(SubmissionPairParams {
            subject,
            initiative_id,
        }),
        QueryCommands::Submission {
            subject,
            initiative_id,
            submission_id,
        } => Query::GetSubmission(SubmissionRef {
            subject,
            initiative_id,
            submission_id,
        }),
        QueryCommands::Verified {
            subject,
            initiative_id,
            submission_id,
        } => Query::GetVerifiedMagnitude(SubmissionRef {
            subject,
            initiative_id,
            submission_id,
        }),
        QueryCommands::State { .. } => return Ok(()),
    };

    let raw = client.query_raw(args.at, &query).await?;
    let result = query.render_output(&raw)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
