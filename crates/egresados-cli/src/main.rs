mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use egresados::{AppConfig, Database};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "egresados")]
#[command(version, about = "Control de Egresados maintenance tool", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "egresados.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the tables and the default administrator
    #[command(name = "init-db")]
    InitDb,

    /// Create a user, or reset the password of an existing one
    #[command(name = "create-user")]
    CreateUser {
        /// Login name
        name: String,

        /// Password for the account
        #[arg(short, long, env = "EGRESADOS_PASSWORD")]
        password: String,
    },

    /// Write a backup now and prune old ones
    Backup {
        /// Override the configured retention
        #[arg(short, long)]
        keep_days: Option<u64>,

        /// Keep every existing backup
        #[arg(long)]
        no_prune: bool,
    },

    /// List existing backups, newest first
    Backups,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?.with_env()?;

    match cli.command {
        Commands::InitDb => {
            let db = connect(&config).await?;
            commands::init_db::execute(&db).await?;
        }
        Commands::CreateUser { name, password } => {
            let db = connect(&config).await?;
            commands::create_user::execute(&db, &name, &password).await?;
        }
        Commands::Backup { keep_days, no_prune } => {
            let db = connect(&config).await?;
            let keep_days = if no_prune {
                None
            } else {
                Some(keep_days.unwrap_or(config.backup.retention_days))
            };
            commands::backup::execute(&db, &config, keep_days).await?;
        }
        Commands::Backups => {
            commands::backups::execute(&config.backup.dir)?;
        }
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> Result<Database> {
    Database::connect(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))
}
