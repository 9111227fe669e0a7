use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

use crate::config::DatabaseConfig;

pub mod entities;
pub mod enums;
pub mod seed;
pub mod services;

fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(config.url());
    opt.max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    opt
}

/// Opens the pool and verifies it with a round-trip.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(connect_options(config)).await?;
    db.ping().await?;
    Ok(db)
}

/// Builds the pool without touching the server; connection errors surface on
/// first use instead.
pub async fn connect_lazy(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = connect_options(config);
    opt.connect_lazy(true);
    Database::connect(opt).await
}
