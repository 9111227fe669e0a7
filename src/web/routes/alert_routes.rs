use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::db::entities::alert;
use crate::db::services;
use crate::web::AppState;
use crate::web::error::{AppError, QueryContext};

const UNRESOLVED_ALERTS_LIMIT: u64 = 20;

async fn get_alerts_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<alert::Model>>, AppError> {
    let db = app_state.db()?;
    let alerts = services::get_unresolved_alerts(db, UNRESOLVED_ALERTS_LIMIT)
        .await
        .context("Failed to fetch alerts")?;
    Ok(Json(alerts))
}

pub fn create_alert_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/alerts", get(get_alerts_handler))
}
