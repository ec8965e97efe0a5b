//! Clubhub CLI
//!
//! Builds the in-memory store from configuration, loads the demo school,
//! and runs one directory query against it.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clubhub_core::ClubCategory;
use clubhub_service::{AppState, ClubhubConfig};
use colored::Colorize;
use commands::Output;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "clubhub")]
#[command(author, version, about = "Clubhub - school club directory and membership queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List active clubs
    Clubs {
        /// Only clubs in this category (Academic, Sports, Arts, Technology, Service)
        #[arg(short, long)]
        category: Option<ClubCategory>,

        /// Case-insensitive text search over name, description and category
        #[arg(short, long)]
        search: Option<String>,

        /// Show membership status for this user
        #[arg(long = "as", value_name = "USERNAME")]
        as_user: Option<String>,
    },

    /// Show one club
    Club {
        /// Club name
        name: String,

        #[arg(long = "as", value_name = "USERNAME")]
        as_user: Option<String>,
    },

    /// List a club's members (club leaders and admins only)
    Members {
        /// Club name
        club: String,

        #[arg(long = "as", value_name = "USERNAME")]
        as_user: String,
    },

    /// List a user's clubs
    Memberships {
        #[arg(long = "as", value_name = "USERNAME")]
        as_user: String,
    },

    /// Show announcements for a club, or the feed of a user
    Announcements {
        /// Club name
        #[arg(long, conflicts_with = "as_user", required_unless_present = "as_user")]
        club: Option<String>,

        #[arg(long = "as", value_name = "USERNAME")]
        as_user: Option<String>,
    },

    /// Show school-wide statistics (admins only)
    Stats {
        #[arg(long = "as", value_name = "USERNAME")]
        as_user: String,
    },

    /// Check a username and password and open a session
    Login { username: String, password: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ClubhubConfig::load().context("Failed to load configuration")?;

    let filter = config.log_filter.clone().unwrap_or_else(|| {
        if cli.verbose {
            "clubhub=debug,clubhub_service=debug,clubhub_core=debug".to_string()
        } else {
            "clubhub=info".to_string()
        }
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Clubhub CLI v{}", env!("CARGO_PKG_VERSION"));
    let state = AppState::bootstrap(&config)
        .await
        .context("Failed to initialize stores")?;

    let output = if cli.json { Output::Json } else { Output::Table };

    let result = match cli.command {
        Commands::Clubs {
            category,
            search,
            as_user,
        } => commands::clubs(&state, output, category, search, as_user.as_deref()).await,
        Commands::Club { name, as_user } => {
            commands::club(&state, output, &name, as_user.as_deref()).await
        }
        Commands::Members { club, as_user } => {
            commands::members(&state, output, &club, &as_user).await
        }
        Commands::Memberships { as_user } => commands::memberships(&state, output, &as_user).await,
        Commands::Announcements { club, as_user } => match (club, as_user) {
            (Some(club), _) => commands::club_announcements(&state, output, &club).await,
            (None, Some(username)) => commands::feed(&state, output, &username).await,
            (None, None) => Err(anyhow::anyhow!("Pass --club or --as")),
        },
        Commands::Stats { as_user } => commands::stats(&state, output, &as_user).await,
        Commands::Login { username, password } => {
            commands::login(&state, output, &username, &password).await
        }
    };

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}
