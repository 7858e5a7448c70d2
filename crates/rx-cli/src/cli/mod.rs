//! CLI for the rx network module resolver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rx_core::cache::CacheService;
use rx_core::config;
use rx_core::NetworkHooks;
use std::path::PathBuf;

use commands::{run_cache_path, run_load, run_lock, run_resolve};

/// Top-level CLI for rx.
#[derive(Debug, Parser)]
#[command(name = "rx")]
#[command(about = "rx: resolve, verify and cache network module imports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a specifier to its canonical URL.
    Resolve {
        /// Module specifier (package name, path or URL).
        specifier: String,
        /// URL of the importing module.
        #[arg(long, value_name = "URL")]
        parent: Option<String>,
    },

    /// Resolve a specifier, then load its source through the content cache.
    Load {
        /// Module specifier (package name, path or URL).
        specifier: String,
        /// URL of the importing module.
        #[arg(long, value_name = "URL")]
        parent: Option<String>,
        /// Write the source here instead of stdout.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Print the lock-file records.
    Lock {
        /// Only show records for this scope ("." is the no-parent scope).
        #[arg(long)]
        scope: Option<String>,
    },

    /// Show where a URL's source is cached and whether the entry is complete.
    CachePath {
        /// Canonical module URL.
        url: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve { specifier, parent } => {
                let hooks = NetworkHooks::from_config(&cfg);
                run_resolve(&hooks, &specifier, parent).await?;
            }
            CliCommand::Load {
                specifier,
                parent,
                output,
            } => {
                let hooks = NetworkHooks::from_config(&cfg);
                run_load(&hooks, &specifier, parent, output.as_deref()).await?;
            }
            CliCommand::Lock { scope } => {
                let cache = CacheService::open(cfg.cache_root());
                run_lock(&cache, scope.as_deref())?;
            }
            CliCommand::CachePath { url } => {
                let cache = CacheService::open(cfg.cache_root());
                run_cache_path(&cache, &url).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
