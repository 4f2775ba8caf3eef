// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Verdant CLI
//!
//! Operator tooling for the Verdant verification engine.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "verdant",
    version,
    about = "Operator tooling for the Verdant verification engine.",
    long_about = "Generates node configurations, replays scripted oracle activity against an engine and queries its state."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate and validate node configurations.
    Config(config::ConfigCmdArgs),

    /// Apply a JSON script of signed calls and print each outcome.
    Replay(replay::ReplayArgs),

    /// Read verification state from a durable store.
    Query(query::QueryArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    verdant_telemetry::init::init_tracing()?;

    match cli.command {
        Commands::Config(args) => config::run(args),
        Commands::Replay(args) => replay::run(args).await,
        Commands::Query(args) => query::run(args).await,
    }
}
