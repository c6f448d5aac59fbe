//! Vehicle diagnostics API entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vehicle_diagnostics::api::{create_router, AppState};
use vehicle_diagnostics::config::Config;
use vehicle_diagnostics::dump::write_vehicles;
use vehicle_diagnostics::metrics;
use vehicle_diagnostics::storage::{SqliteVehicleStore, VehicleStore};
use vehicle_diagnostics::utils::shutdown_signal;
use vehicle_diagnostics::AppError;

/// Vehicle diagnostics API.
#[derive(Parser, Debug)]
#[command(name = "vehicle-diagnostics")]
#[command(about = "HTTP CRUD service for vehicle diagnostic records")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file (overrides DATABASE_URL).
    #[arg(short, long, global = true)]
    database: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print every stored vehicle, one line each, without starting the server.
    Dump,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("vehicle_diagnostics=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port), args.database).await,
        Some(Command::Dump) => cmd_dump(args.database),
        Some(Command::CheckConfig) => cmd_check_config(args.port, args.database),
        None => cmd_serve(args.port, args.database).await,
    }
}

/// Load configuration and apply CLI overrides.
fn load_config(port: Option<u16>, database: Option<String>) -> vehicle_diagnostics::Result<Config> {
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port {
        config.port = port;
    }
    if let Some(database) = database {
        config.database_url = database;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(AppError::InvalidConfig(e));
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config(port: Option<u16>, database: Option<String>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("VEHICLE DIAGNOSTICS API - CONFIGURATION CHECK");
    println!("======================================================================");

    let config = load_config(port, database)?;

    println!("  Database: {}", config.database_path().display());
    println!("  Listen:   {}", config.socket_addr()?);
    println!("  Log:      {}", config.rust_log);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print every stored vehicle straight from the database file.
fn cmd_dump(database: Option<String>) -> anyhow::Result<()> {
    let config = load_config(None, database)?;
    let store = SqliteVehicleStore::open_read_only(config.database_path())?;

    let stdout = std::io::stdout();
    write_vehicles(&store, &mut stdout.lock())?;

    Ok(())
}

/// Serve the HTTP API until a shutdown signal arrives.
async fn cmd_serve(port: Option<u16>, database: Option<String>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config(port, database)?;

    let store = SqliteVehicleStore::open(config.database_path())?;
    info!("Database ready with {} vehicle(s)", store.count()?);

    let mut app_state = AppState::new(Arc::new(store));
    match metrics::init_metrics() {
        Ok(handle) => app_state = app_state.with_metrics(handle),
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
