use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use fleetwatch::config::AppConfig;
use fleetwatch::db;
use fleetwatch::logging::init_logging;
use fleetwatch::version::VERSION;
use fleetwatch::web::{AppState, create_axum_router};

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about = "Fleet dashboard HTTP server", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal.");
    }
    info!("Shutdown signal received.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&config.log_dir, "server.log");
    info!(version = VERSION, environment = %config.environment, "Starting server.");

    // The server still comes up without a database; data routes answer 503.
    let db = match db::connect(&config.database).await {
        Ok(db) => {
            info!(database = %config.database.describe(), "Connected to database.");
            Some(db)
        }
        Err(e) => {
            warn!(database = %config.database.describe(), error = %e, "Database connection failed.");
            None
        }
    };

    let app = create_axum_router(AppState {
        db: db.clone(),
        config: config.clone(),
    });

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await?;
    }
    info!("Server stopped.");
    Ok(())
}
