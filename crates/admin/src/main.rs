//! hub-admin CLI entry point

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hub_db::maintenance;
use hub_db::repositories::VoteRepo;
use hub_rag::cleanup::clean_temporary_documents;
use hub_rag::{RagClient, RagConfig};

use commands::{confirm_reset, print_cleanup_report, print_setup_outcome, print_vote_report};

#[derive(Parser)]
#[command(name = "hub-admin")]
#[command(version, about = "Maintenance tasks for the innovation hub", long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete all data and load the baseline dataset
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Apply migrations and seed an empty database
    Setup,

    /// Print vote statistics
    Votes,

    /// Remove temporary uploads from the RAG store
    CleanRag {
        /// Only list what would be removed
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hub_admin=info,hub_db=info,hub_rag=info")))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Reset { yes } => {
            if !yes && !confirm_reset()? {
                println!("Reset cancelled.");
                return Ok(());
            }
            let pool = connect(cli.database_url.as_deref()).await?;
            hub_db::run_migrations(&pool)
                .await
                .context("failed to run database migrations")?;
            maintenance::reset_and_seed(&pool)
                .await
                .context("database reset failed")?;
            println!(
                "Database reset and seeded with {} ideas.",
                maintenance::SEED_IDEA_COUNT
            );
        }

        Commands::Setup => {
            let pool = connect(cli.database_url.as_deref()).await?;
            hub_db::run_migrations(&pool)
                .await
                .context("failed to run database migrations")?;
            let outcome = maintenance::setup_database(&pool)
                .await
                .context("database setup failed")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_setup_outcome(&outcome);
            }
        }

        Commands::Votes => {
            let pool = connect(cli.database_url.as_deref()).await?;
            let report = VoteRepo::report(&pool)
                .await
                .context("failed to load vote statistics")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_vote_report(&report);
            }
        }

        Commands::CleanRag { dry_run } => {
            let config = RagConfig::from_env();
            let client = RagClient::connect(&config)
                .await
                .with_context(|| format!("cannot reach RAG service at {}", config.base_url))?;
            let report = clean_temporary_documents(&client, dry_run)
                .await
                .context("RAG cleanup failed")?;
            client.shutdown();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_cleanup_report(&report);
            }
            if report.failures() > 0 {
                anyhow::bail!("{} temporary document(s) could not be deleted", report.failures());
            }
        }
    }

    Ok(())
}

async fn connect(database_url: Option<&str>) -> anyhow::Result<hub_db::DbPool> {
    let url = database_url.context("DATABASE_URL must be set")?;
    let pool = hub_db::create_pool(url)
        .await
        .context("failed to connect to database")?;
    tracing::debug!("Database connection pool created");
    Ok(pool)
}
