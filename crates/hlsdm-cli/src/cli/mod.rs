//! CLI for the HLSDM playlist download manager.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hlsdm_core::config;
use std::path::PathBuf;

use commands::{run_config, run_get, run_inspect, GetOptions};

/// Top-level CLI for the HLSDM playlist download manager.
#[derive(Debug, Parser)]
#[command(name = "hlsdm")]
#[command(about = "HLSDM: download HLS playlists segment by segment", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download one or more playlists.
    Get {
        /// Manifest URLs (.m3u8).
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
        /// Root directory for per-job folders (default: config or XDG data dir).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
        /// Drive up to N playlists at once (default: max_concurrent_jobs from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
        /// Retry each failed fetch up to N more times (0 disables retry).
        #[arg(long, value_name = "N")]
        retries: Option<u32>,
        /// Print final job snapshots as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Fetch and parse a manifest without downloading its segments.
    Inspect {
        /// Manifest URL.
        url: String,
    },

    /// Show the config file path and effective settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get {
                urls,
                download_dir,
                jobs,
                retries,
                json,
            } => {
                let opts = GetOptions {
                    download_dir,
                    jobs,
                    retries,
                    json,
                };
                run_get(&cfg, urls, opts).await?
            }
            CliCommand::Inspect { url } => run_inspect(&cfg, &url).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
