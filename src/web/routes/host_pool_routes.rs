use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::db::entities::host_pool;
use crate::db::services;
use crate::web::AppState;
use crate::web::error::{AppError, QueryContext};

async fn get_host_pools_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<host_pool::Model>>, AppError> {
    let db = app_state.db()?;
    let pools = services::get_all_host_pools(db)
        .await
        .context("Failed to fetch host pools")?;
    Ok(Json(pools))
}

pub fn create_host_pool_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/hostpools", get(get_host_pools_handler))
}
