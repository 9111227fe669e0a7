//! Background telemetry generator.
//!
//! Five independent timers keep sessions, host pools, metrics, alerts and
//! user activity moving. Timers never coordinate with each other; a failed
//! tick is logged and the timer keeps going.

use std::sync::Arc;
use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};
use sea_orm::{DatabaseConnection, DbErr};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{error, info};

use crate::config::SimulatorConfig;

pub mod fluctuation;
pub mod tasks;

#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Builds a ticker whose first tick fires immediately when `run_at_start`
/// is set, otherwise after one full period.
fn ticker(period_secs: u64, run_at_start: bool) -> Interval {
    let period = Duration::from_secs(period_secs);
    let mut interval = if run_at_start {
        time::interval(period)
    } else {
        time::interval_at(Instant::now() + period, period)
    };
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

pub struct Simulator {
    db: Arc<DatabaseConnection>,
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new(db: DatabaseConnection, config: SimulatorConfig) -> Self {
        Self { db: Arc::new(db), config }
    }

    /// Spawns every timer on the current runtime. Abort the returned handles
    /// to stop the simulation.
    pub fn spawn(self) -> Vec<JoinHandle<()>> {
        vec![
            self.spawn_session_updates(),
            self.spawn_host_pool_updates(),
            self.spawn_metric_recording(),
            self.spawn_alerts(),
            self.spawn_user_activity(),
        ]
    }

    fn spawn_session_updates(&self) -> JoinHandle<()> {
        let db = self.db.clone();
        let mut interval = ticker(self.config.session_update_secs, true);
        tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            loop {
                interval.tick().await;
                match tasks::fluctuate_sessions(&*db, &mut rng).await {
                    Ok(updated) => info!(updated, "Updated active sessions."),
                    Err(e) => error!(error = %e, "Error updating sessions."),
                }
            }
        })
    }

    fn spawn_host_pool_updates(&self) -> JoinHandle<()> {
        let db = self.db.clone();
        let mut interval = ticker(self.config.host_pool_update_secs, true);
        tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            loop {
                interval.tick().await;
                match tasks::fluctuate_host_pools(&*db, &mut rng).await {
                    Ok(updated) => info!(updated, "Updated host pools."),
                    Err(e) => error!(error = %e, "Error updating host pools."),
                }
            }
        })
    }

    fn spawn_metric_recording(&self) -> JoinHandle<()> {
        let db = self.db.clone();
        let config = self.config.clone();
        let mut interval = ticker(config.metrics_secs, true);
        tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            loop {
                interval.tick().await;
                match tasks::record_metrics(&*db, &mut rng, &config).await {
                    Ok(tick) => info!(
                        recorded = tick.recorded,
                        purged = tick.purged,
                        "Added performance metrics."
                    ),
                    Err(e) => error!(error = %e, "Error adding metrics."),
                }
            }
        })
    }

    fn spawn_alerts(&self) -> JoinHandle<()> {
        let db = self.db.clone();
        let config = self.config.clone();
        let mut interval = ticker(config.alert_secs, false);
        tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            loop {
                interval.tick().await;
                match tasks::generate_alerts(&*db, &mut rng, &config).await {
                    Ok(tick) => {
                        if let Some(alert) = &tick.created {
                            info!(severity = %alert.severity, source = %alert.source, "Generated alert.");
                        }
                        if tick.resolved > 0 {
                            info!(resolved = tick.resolved, "Resolved alert.");
                        }
                    }
                    Err(e) => error!(error = %e, "Error generating alerts."),
                }
            }
        })
    }

    fn spawn_user_activity(&self) -> JoinHandle<()> {
        let db = self.db.clone();
        let config = self.config.clone();
        let mut interval = ticker(config.user_activity_secs, false);
        tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            loop {
                interval.tick().await;
                match tasks::simulate_user_activity(&*db, &mut rng, &config).await {
                    Ok(tick) => {
                        if let Some(session) = &tick.opened {
                            info!(
                                user_id = session.user_id,
                                host_pool = %session.host_pool,
                                "New session created."
                            );
                        }
                        if tick.disconnected > 0 {
                            info!(disconnected = tick.disconnected, "Session disconnected.");
                        }
                    }
                    Err(e) => error!(error = %e, "Error simulating user activity."),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticker_fires_immediately_only_when_asked() {
        let mut immediate = ticker(30, true);
        let mut delayed = ticker(30, false);
        let start = Instant::now();

        immediate.tick().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        delayed.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(30));
    }
}
