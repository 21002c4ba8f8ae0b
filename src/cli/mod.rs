//! CLI module for address-relink.
//!
//! Subcommands:
//! - `run`: Match unlinked addresses and write the SPARQL patch
//! - `candidates`: Print the addresses a run would process
//! - `config`: Print the resolved configuration

mod candidates;
mod config;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, Overrides};

/// address-relink - link knowledge graph addresses to the address registry
#[derive(Parser)]
#[command(name = "address-relink")]
#[command(about = "Link knowledge graph addresses to the address registry")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only process the first candidates (see --sample-size)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Number of candidates processed in a dry run
    #[arg(long, global = true, value_name = "N")]
    pub sample_size: Option<usize>,

    /// Patch file to write
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// SPARQL endpoint of the knowledge graph
    #[arg(long, global = true, value_name = "URL")]
    pub sparql_endpoint: Option<String>,

    /// Address registry match endpoint
    #[arg(long, global = true, value_name = "URL")]
    pub registry_endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match unlinked addresses and write the SPARQL patch
    Run,

    /// Print the candidate addresses as JSON without contacting the registry
    Candidates,

    /// Print the resolved configuration as JSON
    Config,
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Run => self.run_reconcile().await,
            Command::Candidates => self.run_candidates().await,
            Command::Config => self.run_config(),
        }
    }

    /// Loads the layered configuration and applies the command-line flags.
    fn load_config(&self) -> color_eyre::Result<Config> {
        let mut config = Config::load()?;
        config.apply(&self.overrides());
        Ok(config)
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            dry_run: self.dry_run,
            sample_size: self.sample_size,
            output: self.output.clone(),
            sparql_endpoint: self.sparql_endpoint.clone(),
            registry_endpoint: self.registry_endpoint.clone(),
        }
    }
}
