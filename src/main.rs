mod handlers;
mod models;
mod services;
mod utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use services::clock::{Clock, SystemClock};
use services::github_sync::GitHubSyncService;
use services::source_hosting::GitHubClient;
use services::sync_scheduler::SyncScheduler;
use utils::config::Config;
use utils::db::{create_schema, establish_connection};
use utils::validators::validate_username;

#[derive(Debug, Parser)]
#[command(name = "portfolio")]
#[command(about = "Portfolio backend and GitHub cache sync")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sync repository snapshots, commit activity and user contributions from GitHub
    SyncGithub {
        /// GitHub username for contribution data
        #[arg(long)]
        username: Option<String>,
    },
    /// Create missing tables
    Migrate,
    /// Serve the read-only JSON API
    Serve,
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load .env file FIRST before anything else
    dotenv::dotenv().ok();

    // Initialize logger with default level if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    log::info!("Database: {}", config.database_display());
    let db = establish_connection(&config.database_url).await?;
    create_schema(&db).await?;

    match cli.command {
        Commands::Migrate => {
            println!("✅ Schema is up to date");
            Ok(())
        }
        Commands::SyncGithub { username } => {
            let username = username.unwrap_or_else(|| config.github_username.clone());
            validate_username(&username)?;

            let report = sync_service(db, &config)?.run(&username).await?;
            println!(
                "GitHub sync completed: {}/{} projects, {} contribution days for {}",
                report.projects_synced(),
                report.projects.len(),
                report.contributions.days_written,
                report.contributions.username
            );
            Ok(())
        }
        Commands::Serve => serve(db, config).await,
    }
}

fn sync_service(db: DatabaseConnection, config: &Config) -> Result<GitHubSyncService> {
    let client = GitHubClient::from_config(config).context("Failed to create HTTP client")?;
    Ok(GitHubSyncService::new(
        db,
        Arc::new(client),
        Arc::new(SystemClock),
    ))
}

async fn serve(db: DatabaseConnection, config: Config) -> Result<()> {
    if config.sync_interval_minutes > 0 {
        let scheduler = Arc::new(SyncScheduler::new(
            sync_service(db.clone(), &config)?,
            config.github_username.clone(),
            config.sync_interval_minutes,
        ));
        tokio::spawn(scheduler.start());
    } else {
        log::info!("Sync scheduler disabled (SYNC_INTERVAL_MINUTES=0)");
    }

    let host = config.host.clone();
    let port = config.port;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    println!("=================================================");
    println!("🚀 Portfolio backend");
    println!("=================================================");
    println!("🌐 Starting HTTP server at http://{}:{}", host, port);
    println!("📍 Available endpoints:");
    println!("   - GET  http://{}:{}/projects", host, port);
    println!("   - GET  http://{}:{}/projects/{{slug}}", host, port);
    println!("   - GET  http://{}:{}/contributions", host, port);
    println!("   - GET  http://{}:{}/devlog[?limit=N]", host, port);
    println!("   - GET  http://{}:{}/devlog/{{slug}}", host, port);
    println!("=================================================");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::from(clock.clone()))
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}
