use anyhow::Context;
use clap::{Parser, Subcommand};
use inkpost_api::build_router;
use inkpost_config::{load as load_config, AppConfig};
use inkpost_runtime::{telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "inkpost")]
#[command(about = "Inkpost blog backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Print every registered user
    ListUsers,
    /// Delete all articles, categories and users
    ClearData {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env file is normal outside development.
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            return Err(error).context("failed to read .env file");
        }
    }

    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::ListUsers => list_users().await,
        Commands::ClearData { yes } => clear_data(yes).await,
    }
}

async fn initialise() -> anyhow::Result<(AppConfig, BackendServices)> {
    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    Ok((config, services))
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting Inkpost backend");

    let (config, services) = initialise().await?;
    let app = build_router(services.app_state());

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(inkpost_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    services.db_pool.close().await;
    info!("backend shut down");
    Ok(())
}

async fn list_users() -> anyhow::Result<()> {
    let (_, services) = initialise().await?;

    let users = services
        .authenticator
        .store()
        .list()
        .await
        .context("failed to fetch users")?;

    if users.is_empty() {
        println!("No users found in database");
        return Ok(());
    }

    println!("Found {} users:", users.len());
    println!(
        "{:<5} {:<26} {:<24} {:<32} {:<25}",
        "ID", "Public ID", "Name", "Email", "Created At"
    );
    println!("{}", "-".repeat(115));

    for user in users {
        println!(
            "{:<5} {:<26} {:<24} {:<32} {:<25}",
            user.id, user.public_id, user.name, user.email, user.created_at
        );
    }

    Ok(())
}

async fn clear_data(confirmed: bool) -> anyhow::Result<()> {
    if !confirmed {
        anyhow::bail!("clear-data deletes every user, category and article; rerun with --yes");
    }

    let (_, services) = initialise().await?;

    info!("clearing all data from database");
    let cleared = services.clear_all().await?;

    println!("Database cleared:");
    println!("- {} articles deleted", cleared.articles);
    println!("- {} categories deleted", cleared.categories);
    println!("- {} users deleted", cleared.users);

    Ok(())
}
