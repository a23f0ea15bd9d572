//! CLI definitions for the autofill bridge.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Autofill bridge CLI.
#[derive(Parser)]
#[command(name = "autofill-bridge")]
#[command(about = "Answers autofill page-script requests over stdio")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "AUTOFILL_BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Serve JSON-line requests from stdin (default)
    Serve {
        /// Vault fixture to answer from (overrides `vault.fixture`)
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Reply timeout in milliseconds, 0 waits forever (overrides `bridge.reply_timeout_ms`)
        #[arg(long)]
        reply_timeout_ms: Option<u64>,
    },

    /// Load and validate the configuration, then exit
    CheckConfig,
}

/// Default configuration path: `<config dir>/autofill-bridge/config.toml`.
pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autofill-bridge")
        .join("config.toml")
}
