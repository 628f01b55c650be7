//! # step-cli
//!
//! Interactive terminal front end for twostep.
//!
//! ## Commands
//!
//! - `init`: Write a default configuration file
//! - `play`: Move the piece interactively (sign in, move, undo, redo...)
//! - `status`: Show the saved session's state and history
//!
//! ## Example
//!
//! ```bash
//! # Write ~/.local/share/twostep/twostep.toml
//! twostep init --server http://localhost:5000
//!
//! # Play against the configured server
//! twostep play --user alice
//!
//! # Play offline against an in-memory store
//! twostep --mock play
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use twostep_client::{ClientConfig, HttpStateStore, MockStateStore};

mod commands;
mod config;

use commands::{init, play, status};
use config::CliContext;

/// Interactive terminal front end for twostep.
#[derive(Parser, Debug)]
#[command(name = "twostep")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for the config file and saved session
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <data-dir>/twostep.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State service URL, overriding the config file
    #[arg(long, global = true)]
    server: Option<String>,

    /// Use an in-memory store instead of the state service (for testing/demo)
    #[arg(long, global = true)]
    mock: bool,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "twostep_client=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// State service URL to store in the config
        #[arg(long)]
        server: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Move the piece interactively
    Play {
        /// Sign in as this user on start
        #[arg(long, short)]
        user: Option<String>,
    },

    /// Show the saved session's state and history
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let config_path = cli
        .config
        .unwrap_or_else(|| data_dir.join(config::CONFIG_FILE));

    match cli.command {
        Commands::Init { server, force } => {
            init::run(&config_path, server.as_deref(), force)?;
        }
        Commands::Play { user } => {
            let ctx = load_context(data_dir, &config_path, cli.server, cli.mock)?;
            if cli.mock {
                play::run(MockStateStore::new(), &ctx, user.as_deref()).await?;
            } else {
                let store = HttpStateStore::new(&ctx.config.server)?;
                play::run(store, &ctx, user.as_deref()).await?;
            }
        }
        Commands::Status => {
            let ctx = load_context(data_dir, &config_path, cli.server, cli.mock)?;
            if cli.mock {
                status::run(MockStateStore::new(), &ctx).await?;
            } else {
                let store = HttpStateStore::new(&ctx.config.server)?;
                status::run(store, &ctx).await?;
            }
        }
    }

    Ok(())
}

/// Load the config file and apply command-line overrides.
fn load_context(
    data_dir: PathBuf,
    config_path: &Path,
    server: Option<String>,
    mock: bool,
) -> Result<CliContext> {
    let mut config = ClientConfig::load_or_default(config_path)?;
    if let Some(server) = server {
        config.server.base_url = server;
    }
    Ok(CliContext {
        data_dir,
        config,
        persist_session: !mock,
    })
}

/// Get the default data directory for twostep.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("app", "twostep", "twostep")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
