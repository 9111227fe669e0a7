use clap::Parser;
use tracing::{error, info};

use fleetwatch::config::AppConfig;
use fleetwatch::db::{self, seed};
use fleetwatch::logging::init_logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inserts the demo fleet into an empty database", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    init_logging(&config.log_dir, "seed.log");

    let db = match db::connect(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!(database = %config.database.describe(), error = %e, "Database connection failed.");
            return Err(e.into());
        }
    };

    let result = seed::seed_demo_fleet(&db).await;
    db.close().await?;

    match result {
        Ok(summary) => {
            info!(
                active_users = summary.active_users,
                host_pools = summary.host_pools,
                live_sessions = summary.live_sessions,
                unresolved_alerts = summary.unresolved_alerts,
                "Demo fleet added."
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Seeding failed; nothing was committed.");
            Err(e.into())
        }
    }
}
