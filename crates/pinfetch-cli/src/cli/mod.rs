//! CLI for pinfetch: fetch the prebuilt binary of a pinned submodule.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pinfetch_core::config::{self, PinfetchConfig};
use std::path::PathBuf;

use commands::{run_extract, run_fetch, run_resolve, run_sniff};

/// Top-level CLI for pinfetch.
#[derive(Debug, Parser)]
#[command(name = "pinfetch")]
#[command(about = "Download and unpack the CI build of a pinned submodule", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/pinfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository root holding .gitmodules (default: current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub repo_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve the pinned commit, download its CI artifact and unpack it.
    Fetch,

    /// Print the owner, repo, commit and platform that would be fetched.
    Resolve,

    /// Report whether a file is a gzip tarball, a zip, or neither.
    Sniff {
        /// File to inspect.
        path: PathBuf,
    },

    /// Unpack a local archive the same way `fetch` does.
    Extract {
        /// Archive to unpack.
        path: PathBuf,

        /// Destination directory (default: the archive's directory).
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(&cli)?;
        tracing::debug!("loaded config: {:?}", cfg);
        let repo_root = match cli.repo_root {
            Some(dir) => dir,
            None => std::env::current_dir().context("current directory")?,
        };

        match cli.command {
            CliCommand::Fetch => run_fetch(cfg, &repo_root).await?,
            CliCommand::Resolve => run_resolve(&cfg, &repo_root).await?,
            CliCommand::Sniff { path } => run_sniff(&path).await?,
            CliCommand::Extract { path, dest } => run_extract(&cfg, &path, dest.as_deref()).await?,
        }

        Ok(())
    }
}

fn load_config(cli: &Cli) -> Result<PinfetchConfig> {
    match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load_or_init(),
    }
}

#[cfg(test)]
mod tests;
