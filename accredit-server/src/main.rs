//! Accreditation Sync Server
//!
//! HTTP endpoint the mobile assessment client logs in through and syncs
//! its reports with.

mod config;
mod error;
mod handlers;
mod seed;
mod server;
mod storage;

use accredit_core::{LoginPolicy, TransportCipher};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "accredit-server", about = "Accreditation mobile sync server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "accredit.toml")]
    config: PathBuf,

    /// Database path override
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Shared secret override
    #[arg(long, env = "ACCREDIT_CRYPT_SECRET", hide_env_values = true)]
    secret: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Listen address override
        #[arg(short, long)]
        listen: Option<String>,
    },
    /// Load centers, assessors, standards and questions from a JSON file
    Seed { file: PathBuf },
    /// Encrypt text the way the mobile client does
    Encrypt { text: String },
    /// Decrypt a client payload or session token
    Decrypt { blob: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut cfg = if cli.config.exists() {
        config::ServerConfig::load(&cli.config)?
    } else {
        tracing::info!("No config file found, using defaults");
        config::ServerConfig::default()
    };

    if let Some(database) = cli.database {
        cfg.storage_path = database;
    }
    if let Some(secret) = cli.secret {
        cfg.crypt_secret = Some(secret);
    }

    match cli.command.unwrap_or(Command::Serve { listen: None }) {
        Command::Serve { listen } => {
            if let Some(listen) = listen {
                cfg.listen_addr = listen;
            }
            serve(cfg).await
        }
        Command::Seed { file } => {
            let data = seed::SeedData::load(&file)?;
            let db = accredit_core::Database::open(&cfg.storage_path)?;
            let summary = data.apply(&db)?;
            tracing::info!(?summary, "Seeded {}", cfg.storage_path.display());
            Ok(())
        }
        Command::Encrypt { text } => {
            let cipher = TransportCipher::from_secret(cfg.crypt_secret()?);
            println!("{}", cipher.crypt(&text)?);
            Ok(())
        }
        Command::Decrypt { blob } => {
            let cipher = TransportCipher::from_secret(cfg.crypt_secret()?);
            println!("{}", cipher.decrypt(&blob)?);
            Ok(())
        }
    }
}

async fn serve(cfg: config::ServerConfig) -> anyhow::Result<()> {
    let cipher = TransportCipher::from_secret(cfg.crypt_secret()?);
    if cfg.super_admin_enabled {
        tracing::warn!("Built-in admin/admin login is enabled; set super_admin_enabled = false to turn it off");
    }

    tracing::info!("Starting accreditation sync server on {}", cfg.listen_addr);

    let storage = storage::SyncStorage::open(&cfg.storage_path)?;
    let state = server::AppState::new(
        storage,
        cipher,
        LoginPolicy {
            super_admin_enabled: cfg.super_admin_enabled,
        },
    );
    let app = server::build_router(state, &cfg);

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
