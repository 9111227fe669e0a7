use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::web::AppState;
use crate::web::error::AppError;

#[derive(Serialize, Debug)]
pub struct ProcessHealth {
    pub status: &'static str,
    /// RFC 3339.
    pub timestamp: String,
    pub database: &'static str,
    pub environment: String,
}

#[derive(Serialize, Debug)]
pub struct DatabaseHealth {
    pub status: &'static str,
    pub database: &'static str,
}

/// Liveness of the process itself. Always 200; reports whether the startup
/// connection succeeded.
async fn process_health_handler(State(app_state): State<Arc<AppState>>) -> Json<ProcessHealth> {
    Json(ProcessHealth {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        database: if app_state.db.is_some() { "connected" } else { "disconnected" },
        environment: app_state.config.environment.clone(),
    })
}

/// Round-trips to the database.
async fn database_health_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<DatabaseHealth>), AppError> {
    let db = app_state.db()?;
    match db.ping().await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(DatabaseHealth { status: "healthy", database: "connected" }),
        )),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed.");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DatabaseHealth { status: "unhealthy", database: "disconnected" }),
            ))
        }
    }
}

pub fn create_health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(process_health_handler))
        .route("/api/health", get(database_health_handler))
}
