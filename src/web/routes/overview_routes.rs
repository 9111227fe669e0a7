use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::db::services::{self, Overview};
use crate::web::AppState;
use crate::web::error::{AppError, QueryContext};

async fn get_overview_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Overview>, AppError> {
    let db = app_state.db()?;
    let overview = services::get_overview(db)
        .await
        .context("Failed to fetch overview data")?;
    Ok(Json(overview))
}

pub fn create_overview_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/overview", get(get_overview_handler))
}
