// Path: crates/cli/src/commands/replay.rs

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use verdant_cli::script::{replay, Script};
use verdant_types::config::VerdantConfig;

#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// The node configuration. Defaults to an in-memory engine with default parameters.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The JSON script to apply.
    #[clap(long)]
    pub script: PathBuf,

    /// Print the Prometheus text exposition after the run.
    #[clap(long)]
    pub metrics: bool,
}

pub async fn run(args: ReplayArgs) -> Result<()> {
    if args.metrics {
        let sink = verdant_telemetry::prometheus::install()?;
        verdant_telemetry::sinks::SINK
            .set(sink)
            .map_err(|_| anyhow!("metrics sink was already set"))?;
    }

    let config = match &args.config {
        Some(path) => verdant_cli::load_config(path)?,
        None => VerdantConfig::default(),
    };
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let script: Script = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse script {}", args.script.display()))?;

    let client = verdant_cli::connect(&config)?;
    let outcomes = replay(&client, &script).await?;
    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }

    let rejected = outcomes.iter().filter(|o| o.is_rejected()).count();
    tracing::info!(
        target: "replay",
        event = "replay_finished",
        steps = outcomes.len(),
        rejected,
        height = client.machine().last_height().await
    );

    if args.metrics {
        print!("{}", verdant_telemetry::prometheus::render_text()?);
    }
    Ok(())
}
