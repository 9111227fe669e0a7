use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::db::services::{self, SessionWithUser};
use crate::web::AppState;
use crate::web::error::{AppError, QueryContext};

const RECENT_SESSIONS_LIMIT: u64 = 50;

async fn get_sessions_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<SessionWithUser>>, AppError> {
    let db = app_state.db()?;
    let sessions = services::get_recent_sessions(db, RECENT_SESSIONS_LIMIT)
        .await
        .context("Failed to fetch sessions")?;
    Ok(Json(sessions))
}

pub fn create_session_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/sessions", get(get_sessions_handler))
}
