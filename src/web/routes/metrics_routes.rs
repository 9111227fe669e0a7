use axum::{Json, Router, extract::State, routing::get};
use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::db::services::{self, MetricBucket};
use crate::web::AppState;
use crate::web::error::{AppError, QueryContext};

/// How far back the chart looks.
const METRICS_WINDOW_HOURS: i64 = 24;
/// Maximum number of one-minute buckets returned.
const METRICS_BUCKET_LIMIT: u64 = 48;

async fn get_metrics_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<MetricBucket>>, AppError> {
    let db = app_state.db()?;
    let since = Utc::now() - Duration::hours(METRICS_WINDOW_HOURS);
    let buckets = services::get_metric_buckets(db, since, METRICS_BUCKET_LIMIT)
        .await
        .context("Failed to fetch metrics")?;
    Ok(Json(buckets))
}

pub fn create_metrics_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/metrics", get(get_metrics_handler))
}
