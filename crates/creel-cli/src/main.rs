use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use creel_core::{storage::Database, AppConfig};

mod commands;

#[derive(Parser)]
#[command(name = "creel")]
#[command(version, about = "A multi-user command-line RSS aggregator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user and log in as them
    Register {
        /// Username to register
        name: String,
    },
    /// Log in as an existing user
    Login {
        /// Username to log in as
        name: String,
    },
    /// List all registered users
    Users,
    /// Delete all users, feeds, follows, and posts
    Reset,
    /// Add a feed and follow it
    Addfeed {
        /// Display name for the feed
        name: String,
        /// Feed URL
        url: String,
    },
    /// List every feed with its owner
    Feeds,
    /// Follow an existing feed by URL
    Follow {
        /// URL of the feed to follow
        url: String,
    },
    /// List feeds the current user follows
    Following,
    /// Stop following a feed
    Unfollow {
        /// URL of the feed to unfollow
        url: String,
    },
    /// Show recent posts from followed feeds
    Browse {
        /// Maximum number of posts to show
        #[arg(short, long, default_value_t = 2)]
        limit: u32,
    },
    /// Run the feed ingestion loop until interrupted
    Agg {
        /// Seconds between ingest cycles (defaults from config)
        #[arg(short, long)]
        interval_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = AppConfig::load()?;
    let db = Database::new(&config).await?;

    match Cli::parse().command {
        Commands::Register { name } => commands::register::run(&db, &mut config, &name).await,
        Commands::Login { name } => commands::login::run(&db, &mut config, &name).await,
        Commands::Users => commands::users::run(&db, &config).await,
        Commands::Reset => commands::reset::run(&db).await,
        Commands::Addfeed { name, url } => commands::addfeed::run(&db, &config, &name, &url).await,
        Commands::Feeds => commands::feeds::run(&db).await,
        Commands::Follow { url } => commands::follow::run(&db, &config, &url).await,
        Commands::Following => commands::following::run(&db, &config).await,
        Commands::Unfollow { url } => commands::unfollow::run(&db, &config, &url).await,
        Commands::Browse { limit } => commands::browse::run(&db, &config, limit).await,
        Commands::Agg { interval_secs } => commands::agg::run(&db, &config, interval_secs).await,
    }
}
