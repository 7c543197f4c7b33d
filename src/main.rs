mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use llmaget::config::Settings;

#[derive(Parser)]
#[command(
    name = "llmaget",
    version,
    about = "Risingstones automation: profile refresh, daily sign-in, reward claims and character search",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json) [env: LLMAGET_LOG_FORMAT]
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Credentials file [env: LLMAGET_CONFIG_FILE]
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    /// Profile snapshot file [env: LLMAGET_SNAPSHOT_FILE]
    #[arg(long, global = true)]
    snapshot_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler and the HTTP API (default)
    Serve {
        /// Bind address [env: LLMAGET_BIND]
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Fetch the profile once and store the snapshot
    Fetch,

    /// Sign in once
    SignIn,

    /// List this month's sign-in rewards
    Rewards,

    /// Claim one reward of this month
    Claim {
        /// Reward id
        id: i64,
    },

    /// Sign in and claim every claimable reward
    SignAndClaim,

    /// Find a character by exact name
    Search {
        /// Character name
        name: String,

        /// Server name or region alias (n, z, m, g)
        server: Option<String>,
    },

    /// Show character binding info
    BindInfo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    if let Some(path) = cli.config_file {
        settings.storage.config_file = path;
    }
    if let Some(path) = cli.snapshot_file {
        settings.storage.snapshot_file = path;
    }
    if let Some(Commands::Serve { bind: Some(addr) }) = &cli.command {
        settings.server.bind_address = *addr;
    }
    settings.validate()?;

    // Initialize tracing/logging
    setup_tracing(&settings.logging.format, cli.verbose)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "llmaget starting");

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { .. } => {
            tracing::info!(bind = %settings.server.bind_address, "Starting serve command");
            commands::serve(settings).await?;
        }
        Commands::Fetch => commands::fetch(settings).await?,
        Commands::SignIn => commands::sign_in(settings).await?,
        Commands::Rewards => commands::rewards(settings).await?,
        Commands::Claim { id } => {
            tracing::info!(id, "Starting claim command");
            commands::claim(settings, id).await?;
        }
        Commands::SignAndClaim => commands::sign_and_claim(settings).await?,
        Commands::Search { name, server } => {
            tracing::info!(name = %name, server = ?server, "Starting search command");
            commands::search(settings, name, server).await?;
        }
        Commands::BindInfo => commands::bind_info(settings).await?,
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("llmaget=debug,tower_http=debug,info")
        } else {
            EnvFilter::new("llmaget=info,warn")
        }
    });

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
