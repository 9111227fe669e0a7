use clap::Parser;
use tracing::{error, info};

use fleetwatch::config::AppConfig;
use fleetwatch::db;
use fleetwatch::logging::init_logging;
use fleetwatch::simulator::Simulator;
use fleetwatch::version::VERSION;

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about = "Generates live-looking fleet telemetry", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&config.log_dir, "simulator.log");
    info!(version = VERSION, "Starting simulator.");

    // Lazy pool: an unreachable database shows up as per-tick errors.
    let db = db::connect_lazy(&config.database).await?;
    info!(database = %config.database.describe(), simulator = ?config.simulator, "Simulation running.");

    let handles = Simulator::new(db.clone(), config.simulator.clone()).spawn();

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal.");
    }
    info!("Stopping simulator...");

    for handle in &handles {
        handle.abort();
    }
    db.close().await?;
    Ok(())
}
