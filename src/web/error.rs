use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database not connected")]
    DatabaseUnavailable,
    #[error("{message}: {source}")]
    QueryFailed {
        message: &'static str,
        #[source]
        source: DbErr,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DatabaseUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Database not connected")
            }
            AppError::QueryFailed { message, source } => {
                tracing::error!(error = %source, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}

/// Attaches the client-facing message to a failed query.
pub trait QueryContext<T> {
    fn context(self, message: &'static str) -> Result<T, AppError>;
}

impl<T> QueryContext<T> for Result<T, DbErr> {
    fn context(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|source| AppError::QueryFailed { message, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unavailable_maps_to_503() {
        let response = AppError::DatabaseUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"], "Database not connected");
    }

    #[tokio::test]
    async fn test_query_failure_hides_driver_error() {
        let failed: Result<(), DbErr> = Err(DbErr::Custom("relation does not exist".into()));
        let response = failed.context("Failed to fetch alerts").unwrap_err().into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Failed to fetch alerts" })
        );
    }
}
