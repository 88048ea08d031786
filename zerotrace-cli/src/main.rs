//! ZeroTrace CLI
//!
//! Command-line interface for ZeroTrace - end-to-end encrypted messaging.

mod commands;
mod config;
mod display;
mod presenter;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zerotrace_core::{ClientError, DEFAULT_API_BASE};

use config::CliConfig;

#[derive(Parser)]
#[command(name = "zerotrace")]
#[command(version, about = "End-to-end encrypted messaging")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Messaging service URL
    #[arg(long, global = true, env = "ZEROTRACE_API_URL", default_value = DEFAULT_API_BASE)]
    api: String,

    /// Seconds between polls in `watch`
    #[arg(long, global = true, default_value_t = 3)]
    poll_interval_secs: u64,

    /// Route service calls through the local Tor SOCKS proxy
    #[arg(long, global = true)]
    tor: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new identity
    Init,

    /// Show your identity
    Whoami,

    /// Export identity backup
    Export {
        /// Output file path
        output: PathBuf,
    },

    /// Delete your identity and all conversations
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// List conversations
    Threads {
        /// Sync with the service first
        #[arg(long)]
        refresh: bool,
    },

    /// Start a conversation
    Connect {
        /// Recipient identity hash
        recipient: String,
    },

    /// Send a message
    Send {
        /// Recipient identity hash
        recipient: String,

        /// Message text
        text: String,
    },

    /// Show the messages of a conversation
    Read {
        /// Recipient identity hash
        recipient: String,
    },

    /// Follow a conversation until Ctrl-C
    Watch {
        /// Recipient identity hash
        recipient: String,
    },

    /// Show your state root
    State,
}

/// Installs the tracing subscriber. `RUST_LOG` overrides the default level.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Resolve data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zerotrace")
    });

    let config = CliConfig {
        data_dir,
        api_url: cli.api,
        poll_interval: Duration::from_secs(cli.poll_interval_secs),
        use_tor: cli.tor,
    };

    match cli.command {
        Commands::Init => commands::identity::init(&config).await?,
        Commands::Whoami => commands::identity::whoami(&config)?,
        Commands::Export { output } => commands::identity::export(&config, &output)?,
        Commands::Reset { yes } => commands::identity::reset(&config, yes)?,
        Commands::Threads { refresh } => commands::threads::list(&config, refresh).await?,
        Commands::Connect { recipient } => commands::chat::connect(&config, &recipient).await?,
        Commands::Send { recipient, text } => {
            commands::chat::send(&config, &recipient, &text).await?
        }
        Commands::Read { recipient } => commands::chat::read(&config, &recipient).await?,
        Commands::Watch { recipient } => commands::chat::watch(&config, &recipient).await?,
        Commands::State => commands::identity::state(&config).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Service failures were already shown as a notice by the engine.
            let notified = matches!(
                err.downcast_ref::<ClientError>(),
                Some(ClientError::Gateway(_))
            );
            if !notified {
                display::error(&format!("{:#}", err));
            }
            ExitCode::FAILURE
        }
    }
}
