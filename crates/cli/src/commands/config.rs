// Path: crates/cli/src/commands/config.rs

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use verdant_types::app::AccountId;
use verdant_types::config::{StateBackend, VerdantConfig};

#[derive(Parser, Debug)]
pub struct ConfigCmdArgs {
    #[clap(subcommand)]
    pub command: ConfigSubCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubCommands {
    /// Write a default verdant.toml.
    New {
        #[clap(long, default_value = "verdant.toml")]
        out: PathBuf,
        /// The deployer account (32-byte hex) that holds the owner and admin roles.
        #[clap(long)]
        deployer: Option<AccountId>,
        /// Use the durable redb backend with this state file.
        #[clap(long)]
        state_file: Option<String>,
        /// Overwrite an existing file.
        #[clap(long)]
        force: bool,
    },
    /// Parse and validate an existing configuration.
    Check { path: PathBuf },
}

pub fn run(args: ConfigCmdArgs) -> Result<()> {
    match args.command {
        ConfigSubCommands::New {
            out,
            deployer,
            state_file,
            force,
        } => {
            if out.exists() && !force {
                bail!("{} already exists. Pass --force to overwrite it.", out.display());
            }

            let mut config = VerdantConfig::default();
            if let Some(deployer) = deployer {
                config.node.deployer = deployer;
            }
            if let Some(state_file) = state_file {
                config.node.state_backend = StateBackend::Redb;
                config.node.state_file = Some(state_file);
            }
            config.validate()?;

            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&out, toml::to_string_pretty(&config)?)?;
            println!("Wrote {}", out.display());
        }
        ConfigSubCommands::Check { path } => {
            let config = verdant_cli::load_config(&path)?;
            println!(
                "{} is valid: backend {:?}, {} initiative(s), quorum {}",
                path.display(),
                config.node.state_backend,
                config.initiatives.len(),
                config.verification.quorum_threshold
            );
        }
    }
    Ok(())
}
