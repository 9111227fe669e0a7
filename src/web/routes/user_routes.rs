use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::db::services::{self, UserActivity};
use crate::web::AppState;
use crate::web::error::{AppError, QueryContext};

const USER_LIST_LIMIT: u64 = 50;

async fn get_users_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserActivity>>, AppError> {
    let db = app_state.db()?;
    let users = services::get_user_activity(db, USER_LIST_LIMIT)
        .await
        .context("Failed to fetch users")?;
    Ok(Json(users))
}

pub fn create_user_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", get(get_users_handler))
}
