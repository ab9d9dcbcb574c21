//! Facturo CLI - Database migrations and company management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run directory database migrations
//! facturo migrate
//!
//! # Show the fiscal regions and their identifier fields
//! facturo regions
//!
//! # Manage the companies of a user
//! facturo --user 6f1c... company create "Acme SARL" --region EU --siret 12345678900012
//! facturo --user 6f1c... company list
//! facturo --user 6f1c... company set-default 9b2e...
//! facturo --user 6f1c... company profile
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `regions` - List fiscal regions
//! - `company` - List, create, update, delete companies and pick the default
//!
//! The user may also be given through `FACTURO_USER_ID`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use facturo_core::UserId;
use facturo_directory::{DirectoryConfig, LogFormat};

mod commands;

use commands::company::{CompanyAction, CompanyArgs};

#[derive(Parser)]
#[command(name = "facturo")]
#[command(author, version, about = "Facturo CLI tools")]
struct Cli {
    /// User whose companies are managed
    #[arg(long, env = "FACTURO_USER_ID", global = true)]
    user: Option<UserId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// List fiscal regions and their identifier fields
    Regions,
    /// Manage companies
    Company {
        #[command(subcommand)]
        action: CompanyAction,
    },
}

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "facturo_directory=info,facturo_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match DirectoryConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &DirectoryConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run(config).await?,
        Commands::Regions => commands::regions::run(),
        Commands::Company { action } => {
            let args = CompanyArgs {
                user: cli.user,
                action,
            };
            commands::company::run(config, args).await?;
        }
    }
    Ok(())
}
