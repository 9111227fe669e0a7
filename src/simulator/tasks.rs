//! One function per simulator timer. Each runs a single tick against the
//! database and reports what it changed; scheduling lives in `super`.

use chrono::{Duration, Utc};
use rand::{Rng, seq::IndexedRandom};
use sea_orm::ConnectionTrait;

use crate::config::SimulatorConfig;
use crate::db::entities::{alert, session};
use crate::db::enums::{AlertSeverity, SessionStatus};
use crate::db::services::{
    create_alert, create_session, disconnect_session, get_all_host_pools, list_active_sessions,
    list_active_users, list_online_host_pools, list_resolvable_alerts, purge_metrics_before,
    record_session_samples, resolve_alert, update_host_pool_usage, update_session_usage,
};
use crate::simulator::SimulatorError;
use crate::simulator::fluctuation::{apply_load_delta, fluctuate, load_delta};

const SESSION_CPU_VARIANCE: f64 = 15.0;
const SESSION_MEMORY_VARIANCE: f64 = 8.0;
const HOST_POOL_CPU_VARIANCE: f64 = 12.0;
const HOST_POOL_MEMORY_VARIANCE: f64 = 10.0;

/// Source recorded on alerts raised while no host pools exist.
pub const SYSTEM_SOURCE: &str = "System";

pub const ALERT_CATALOG: &[(AlertSeverity, &[&str])] = &[
    (
        AlertSeverity::Critical,
        &["High CPU usage detected", "Memory threshold exceeded", "Session limit reached"],
    ),
    (
        AlertSeverity::Warning,
        &["Unusual login pattern", "Performance degradation", "Capacity warning"],
    ),
    (
        AlertSeverity::Info,
        &["Scheduled maintenance", "System update available", "Backup completed"],
    ),
];

/// Severity and catalog message for the next alert.
pub fn pick_alert<R: Rng>(rng: &mut R) -> (AlertSeverity, &'static str) {
    let idx = rng.random_range(0..ALERT_CATALOG.len());
    let (severity, messages) = ALERT_CATALOG[idx];
    let message = messages[rng.random_range(0..messages.len())];
    (severity, message)
}

pub fn alert_message(message: &str, source: &str) -> String {
    format!("{message} on {source}")
}

/// Starting CPU and memory for a freshly opened session.
pub fn initial_session_usage<R: Rng>(rng: &mut R) -> (f64, f64) {
    let cpu = 20.0 + rng.random::<f64>() * 50.0;
    let memory = 30.0 + rng.random::<f64>() * 40.0;
    (cpu, memory)
}

/// Drifts CPU and memory of every active session and bumps its duration.
/// Returns the number of sessions written.
pub async fn fluctuate_sessions<C, R>(db: &C, rng: &mut R) -> Result<u64, SimulatorError>
where
    C: ConnectionTrait,
    R: Rng,
{
    let sessions = list_active_sessions(db).await?;
    let mut updated = 0;
    for s in sessions {
        let cpu = fluctuate(rng, s.cpu_usage, SESSION_CPU_VARIANCE);
        let memory = fluctuate(rng, s.memory_usage, SESSION_MEMORY_VARIANCE);
        let duration = s.duration.saturating_add(1);
        updated += update_session_usage(db, s.session_id, cpu, memory, duration).await?;
    }
    Ok(updated)
}

/// Drifts utilisation and load of every online host pool.
pub async fn fluctuate_host_pools<C, R>(db: &C, rng: &mut R) -> Result<u64, SimulatorError>
where
    C: ConnectionTrait,
    R: Rng,
{
    let pools = list_online_host_pools(db).await?;
    let mut updated = 0;
    for p in pools {
        let cpu = fluctuate(rng, p.cpu_usage, HOST_POOL_CPU_VARIANCE);
        let memory = fluctuate(rng, p.memory_usage, HOST_POOL_MEMORY_VARIANCE);
        let load = apply_load_delta(p.current_load, load_delta(rng), p.total_capacity);
        updated += update_host_pool_usage(db, p.host_pool_id, cpu, memory, load).await?;
    }
    Ok(updated)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MetricsTick {
    pub recorded: usize,
    pub purged: u64,
}

/// Samples a few random active sessions into `performance_metrics` and drops
/// samples past the retention window.
pub async fn record_metrics<C, R>(
    db: &C,
    rng: &mut R,
    config: &SimulatorConfig,
) -> Result<MetricsTick, SimulatorError>
where
    C: ConnectionTrait,
    R: Rng,
{
    let sessions = list_active_sessions(db).await?;
    let sample: Vec<session::Model> = sessions
        .choose_multiple(rng, config.metric_sample_size as usize)
        .cloned()
        .collect();
    let recorded = record_session_samples(db, &sample).await?;

    let cutoff = Utc::now() - Duration::hours(config.metric_retention_hours);
    let purged = purge_metrics_before(db, cutoff).await?;

    Ok(MetricsTick { recorded, purged })
}

#[derive(Debug, Default)]
pub struct AlertTick {
    pub created: Option<alert::Model>,
    pub resolved: u64,
}

/// Possibly raises one alert and possibly resolves one old alert.
pub async fn generate_alerts<C, R>(
    db: &C,
    rng: &mut R,
    config: &SimulatorConfig,
) -> Result<AlertTick, SimulatorError>
where
    C: ConnectionTrait,
    R: Rng,
{
    let mut tick = AlertTick::default();

    if rng.random_bool(config.alert_create_probability) {
        let (severity, message) = pick_alert(rng);
        let pools = get_all_host_pools(db).await?;
        let source = pools
            .choose(rng)
            .map(|p| p.name.as_str())
            .unwrap_or(SYSTEM_SOURCE);
        let created = create_alert(db, severity, &alert_message(message, source), source).await?;
        tick.created = Some(created);
    }

    if rng.random_bool(config.alert_resolve_probability) {
        let created_before = Utc::now() - Duration::minutes(config.alert_resolve_min_age_minutes);
        let candidates = list_resolvable_alerts(db, created_before).await?;
        if let Some(a) = candidates.choose(rng) {
            tick.resolved = resolve_alert(db, a.alert_id).await?;
        }
    }

    Ok(tick)
}

#[derive(Debug, Default)]
pub struct ActivityTick {
    pub opened: Option<session::Model>,
    pub disconnected: u64,
}

/// Possibly opens a session for a random active user and possibly
/// disconnects a random active session.
pub async fn simulate_user_activity<C, R>(
    db: &C,
    rng: &mut R,
    config: &SimulatorConfig,
) -> Result<ActivityTick, SimulatorError>
where
    C: ConnectionTrait,
    R: Rng,
{
    let mut tick = ActivityTick::default();

    if rng.random_bool(config.session_create_probability) {
        let users = list_active_users(db).await?;
        let pools = list_online_host_pools(db).await?;
        if let (Some(user), Some(pool)) = (users.choose(rng), pools.choose(rng)) {
            let (cpu, memory) = initial_session_usage(rng);
            let opened = create_session(
                db,
                user.user_id,
                &pool.name,
                SessionStatus::Active,
                cpu,
                memory,
                0,
            )
            .await?;
            tick.opened = Some(opened);
        }
    }

    if rng.random_bool(config.session_disconnect_probability) {
        let sessions = list_active_sessions(db).await?;
        if let Some(s) = sessions.choose(rng) {
            tick.disconnected = disconnect_session(db, s.session_id).await?;
        }
    }

    Ok(tick)
}
