//! Aqua Rêve cart runtime CLI.

use std::{process, sync::Arc};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use aquareve_app::{
    config::{AbandonedTrackerConfig, ExpiryMonitorConfig},
    context::AppContext,
    database,
    domain::abandoned::{AbandonedCartsStore, PgAbandonedCartsStore},
    tasks::{AbandonedCartTracker, GiftExpiryMonitor},
};

#[derive(Debug, Parser)]
#[command(name = "aquareve-app", about = "Aqua Rêve cart runtime", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the cart runtime with its background tasks
    Run(RunArgs),
    /// Create the abandoned-carts table when missing
    EnsureSchema(DbArgs),
    /// Print a session's persisted abandoned cart
    ShowAbandoned(ShowAbandonedArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Session UUID for abandoned-cart records; generated when omitted
    #[arg(long, env = "SESSION_UUID")]
    session: Option<Uuid>,

    #[command(flatten)]
    expiry: ExpiryMonitorConfig,

    #[command(flatten)]
    abandoned: AbandonedTrackerConfig,
}

#[derive(Debug, Args)]
struct DbArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct ShowAbandonedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Session UUID to look up
    #[arg(long)]
    session: Uuid,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Run(args) => run_tasks(args).await,
        Commands::EnsureSchema(args) => ensure_schema(args).await,
        Commands::ShowAbandoned(args) => show_abandoned(args).await,
    }
}

async fn run_tasks(args: RunArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|error| format!("failed to build app context: {error}"))?;

    let session = args.session.unwrap_or_else(Uuid::now_v7);

    let monitor = GiftExpiryMonitor::new(ctx.cart.clone(), ctx.notifier.clone(), args.expiry);
    let tracker = Arc::new(AbandonedCartTracker::new(
        ctx.cart.clone(),
        ctx.activity.clone(),
        ctx.store.clone(),
        session,
        args.abandoned,
    ));

    let monitor_handle = monitor.spawn();
    let tracker_handle = tracker.spawn();

    tracing::info!(%session, "cart runtime started");

    tokio::signal::ctrl_c()
        .await
        .map_err(|error| format!("failed to listen for shutdown signal: {error}"))?;

    tracing::info!("shutting down");

    monitor_handle.stop().await;
    tracker_handle.stop().await;

    Ok(())
}

async fn ensure_schema(args: DbArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::ensure_schema(&pool)
        .await
        .map_err(|error| format!("failed to ensure schema: {error}"))?;

    println!("abandoned_carts table is ready");

    Ok(())
}

async fn show_abandoned(args: ShowAbandonedArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let store = PgAbandonedCartsStore::new(pool);

    let record = store
        .get_abandoned_cart(args.session)
        .await
        .map_err(|error| format!("failed to load abandoned cart: {error}"))?;

    println!("session: {}", record.session);
    println!("captured_at: {}", record.captured_at);
    println!("updated_at: {}", record.updated_at);
    println!("recovered: {}", record.recovered);
    println!("total: {}", record.total);

    for item in &record.items {
        println!("  {} x{} @ {}", item.id, item.quantity, item.unit_price);
    }

    Ok(())
}
