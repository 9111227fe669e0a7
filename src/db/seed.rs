//! Demo fleet used to populate an empty database.
//!
//! Everything is inserted inside one transaction, so a failed run leaves the
//! tables as they were.

use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

use crate::db::enums::{AlertSeverity, HostPoolStatus, SessionStatus, UserStatus};
use crate::db::services::{
    count_active_users, count_host_pools, count_live_sessions, count_unresolved_alerts,
    create_alert, create_host_pool, create_session, create_user,
};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Seed session references unknown user: {0}")]
    UnknownUser(String),
}

pub struct SeedUser {
    pub username: &'static str,
    pub email: &'static str,
    pub status: UserStatus,
    pub last_login_minutes_ago: Option<i64>,
}

pub struct SeedHostPool {
    pub name: &'static str,
    pub region: &'static str,
    pub status: HostPoolStatus,
    pub total_capacity: i32,
    pub current_load: i32,
    pub cpu_usage: f64,
    pub memory_usage: f64,
}

pub struct SeedSession {
    pub username: &'static str,
    pub host_pool: &'static str,
    pub status: SessionStatus,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub duration: i32,
}

pub struct SeedAlert {
    pub severity: AlertSeverity,
    pub message: &'static str,
    pub source: &'static str,
}

pub const USERS: &[SeedUser] = &[
    SeedUser { username: "john.doe", email: "john.doe@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(5) },
    SeedUser { username: "jane.smith", email: "jane.smith@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(15) },
    SeedUser { username: "alex.brown", email: "alex.brown@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(30) },
    SeedUser { username: "maria.garcia", email: "maria.garcia@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(90) },
    SeedUser { username: "tom.wilson", email: "tom.wilson@company.com", status: UserStatus::Inactive, last_login_minutes_ago: Some(7 * 24 * 60) },
    SeedUser { username: "mike.johnson", email: "mike.johnson@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(10) },
    SeedUser { username: "sarah.williams", email: "sarah.williams@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(25) },
    SeedUser { username: "david.lee", email: "david.lee@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(45) },
    SeedUser { username: "emily.chen", email: "emily.chen@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(60) },
    SeedUser { username: "robert.taylor", email: "robert.taylor@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(120) },
    SeedUser { username: "lisa.anderson", email: "lisa.anderson@company.com", status: UserStatus::Active, last_login_minutes_ago: Some(180) },
];

pub const HOST_POOLS: &[SeedHostPool] = &[
    SeedHostPool { name: "Pool-EastUS-01", region: "East US", status: HostPoolStatus::Online, total_capacity: 100, current_load: 64, cpu_usage: 55.1, memory_usage: 67.4 },
    SeedHostPool { name: "Pool-WestEurope-01", region: "West Europe", status: HostPoolStatus::Offline, total_capacity: 120, current_load: 0, cpu_usage: 0.0, memory_usage: 0.0 },
    SeedHostPool { name: "Pool-EastUS-02", region: "East US", status: HostPoolStatus::Online, total_capacity: 150, current_load: 95, cpu_usage: 62.3, memory_usage: 78.5 },
    SeedHostPool { name: "Pool-SouthCentral-01", region: "South Central US", status: HostPoolStatus::Online, total_capacity: 90, current_load: 52, cpu_usage: 45.8, memory_usage: 58.3 },
    SeedHostPool { name: "Pool-UKSouth-01", region: "UK South", status: HostPoolStatus::Online, total_capacity: 70, current_load: 38, cpu_usage: 38.2, memory_usage: 52.7 },
    SeedHostPool { name: "Pool-AsiaSoutheast-01", region: "Southeast Asia", status: HostPoolStatus::Online, total_capacity: 80, current_load: 45, cpu_usage: 51.4, memory_usage: 64.2 },
    SeedHostPool { name: "Pool-AustraliaEast-01", region: "Australia East", status: HostPoolStatus::Online, total_capacity: 60, current_load: 22, cpu_usage: 28.9, memory_usage: 35.1 },
];

pub const SESSIONS: &[SeedSession] = &[
    SeedSession { username: "mike.johnson", host_pool: "Pool-EastUS-02", status: SessionStatus::Active, cpu_usage: 58.3, memory_usage: 72.1, duration: 145 },
    SeedSession { username: "sarah.williams", host_pool: "Pool-SouthCentral-01", status: SessionStatus::Active, cpu_usage: 42.7, memory_usage: 61.8, duration: 220 },
    SeedSession { username: "david.lee", host_pool: "Pool-UKSouth-01", status: SessionStatus::Active, cpu_usage: 35.2, memory_usage: 48.3, duration: 85 },
    SeedSession { username: "emily.chen", host_pool: "Pool-AsiaSoutheast-01", status: SessionStatus::Active, cpu_usage: 68.9, memory_usage: 79.4, duration: 165 },
    SeedSession { username: "robert.taylor", host_pool: "Pool-AustraliaEast-01", status: SessionStatus::Idle, cpu_usage: 12.3, memory_usage: 28.7, duration: 95 },
    SeedSession { username: "lisa.anderson", host_pool: "Pool-EastUS-02", status: SessionStatus::Active, cpu_usage: 71.2, memory_usage: 85.6, duration: 310 },
    SeedSession { username: "john.doe", host_pool: "Pool-SouthCentral-01", status: SessionStatus::Active, cpu_usage: 48.5, memory_usage: 65.2, duration: 125 },
    SeedSession { username: "jane.smith", host_pool: "Pool-UKSouth-01", status: SessionStatus::Disconnected, cpu_usage: 5.2, memory_usage: 15.3, duration: 45 },
];

pub const ALERTS: &[SeedAlert] = &[
    SeedAlert { severity: AlertSeverity::Warning, message: "Network latency spike detected", source: "Pool-AsiaSoutheast-01" },
    SeedAlert { severity: AlertSeverity::Info, message: "New user onboarded successfully", source: "System" },
    SeedAlert { severity: AlertSeverity::Critical, message: "Disk space threshold exceeded", source: "Pool-EastUS-02" },
    SeedAlert { severity: AlertSeverity::Warning, message: "Session timeout approaching for multiple users", source: "Session Monitor" },
];

/// Totals reported after seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub active_users: i64,
    pub host_pools: i64,
    pub live_sessions: i64,
    pub unresolved_alerts: i64,
}

pub async fn seed_demo_fleet(db: &DatabaseConnection) -> Result<SeedSummary, SeedError> {
    let txn = db.begin().await?;
    let now = Utc::now();

    let mut user_ids = HashMap::with_capacity(USERS.len());
    for seed in USERS {
        let last_login = seed.last_login_minutes_ago.map(|m| now - Duration::minutes(m));
        let user = create_user(&txn, seed.username, seed.email, seed.status, last_login).await?;
        user_ids.insert(user.username, user.user_id);
    }
    info!(count = USERS.len(), "Added users.");

    for seed in HOST_POOLS {
        create_host_pool(
            &txn,
            seed.name,
            seed.region,
            seed.status,
            seed.total_capacity,
            seed.current_load,
            seed.cpu_usage,
            seed.memory_usage,
        )
        .await?;
    }
    info!(count = HOST_POOLS.len(), "Added host pools.");

    for seed in SESSIONS {
        let user_id = *user_ids
            .get(seed.username)
            .ok_or_else(|| SeedError::UnknownUser(seed.username.to_string()))?;
        create_session(
            &txn,
            user_id,
            seed.host_pool,
            seed.status,
            seed.cpu_usage,
            seed.memory_usage,
            seed.duration,
        )
        .await?;
    }
    info!(count = SESSIONS.len(), "Added sessions.");

    for seed in ALERTS {
        create_alert(&txn, seed.severity, seed.message, seed.source).await?;
    }
    info!(count = ALERTS.len(), "Added alerts.");

    txn.commit().await?;

    Ok(SeedSummary {
        active_users: count_active_users(db).await?,
        host_pools: count_host_pools(db, None).await?,
        live_sessions: count_live_sessions(db).await?,
        unresolved_alerts: count_unresolved_alerts(db).await?,
    })
}
