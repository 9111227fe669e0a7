use axum::{Router, http::Method, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::web::error::AppError;
use crate::web::routes::*;

pub mod assets;
pub mod error;
pub mod routes;

pub struct AppState {
    /// `None` when the startup connection failed; data routes then answer 503.
    pub db: Option<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db.as_ref().ok_or(AppError::DatabaseUnavailable)
    }
}

pub fn create_axum_router(app_state: AppState) -> Router {
    let app_state = Arc::new(app_state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .merge(health_routes::create_health_router())
        .merge(overview_routes::create_overview_router())
        .merge(session_routes::create_session_router())
        .merge(host_pool_routes::create_host_pool_router())
        .merge(metrics_routes::create_metrics_router())
        .merge(user_routes::create_user_router())
        .merge(alert_routes::create_alert_router())
        .route("/", get(assets::index_handler))
        .fallback(assets::static_handler)
        .with_state(app_state)
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileConfig, PartialAppConfig};
    use crate::db::entities::host_pool;
    use crate::db::enums::HostPoolStatus;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use tower::ServiceExt;

    const DATA_ROUTES: [&str; 7] = [
        "/api/overview",
        "/api/sessions",
        "/api/hostpools",
        "/api/metrics",
        "/api/users",
        "/api/alerts",
        "/api/health",
    ];

    fn test_config() -> Arc<AppConfig> {
        Arc::new(AppConfig::from_layers(FileConfig::default(), PartialAppConfig::default()).unwrap())
    }

    fn router(db: Option<DatabaseConnection>) -> Router {
        create_axum_router(AppState { db, config: test_config() })
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_every_data_route_answers_503_without_database() {
        for uri in DATA_ROUTES {
            let response = send_get(router(None), uri).await;
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
            assert_eq!(body_json(response).await["error"], "Database not connected", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_process_health_reports_missing_database() {
        let response = send_get(router(None), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "disconnected");
        assert_eq!(body["environment"], "development");
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_query_failure_answers_500_with_route_message() {
        let cases = [
            ("/api/overview", "Failed to fetch overview data"),
            ("/api/sessions", "Failed to fetch sessions"),
            ("/api/hostpools", "Failed to fetch host pools"),
            ("/api/metrics", "Failed to fetch metrics"),
            ("/api/users", "Failed to fetch users"),
            ("/api/alerts", "Failed to fetch alerts"),
        ];
        for (uri, message) in cases {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection reset".to_string())])
                .into_connection();

            let response = send_get(router(Some(db)), uri).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body_json(response).await, serde_json::json!({ "error": message }));
        }
    }

    #[tokio::test]
    async fn test_host_pools_are_returned_as_json_records() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![host_pool::Model {
                host_pool_id: 3,
                name: "Pool-EastUS-02".to_string(),
                region: "East US".to_string(),
                status: HostPoolStatus::Online,
                total_capacity: 150,
                current_load: 95,
                cpu_usage: 62.3,
                memory_usage: 78.5,
                last_updated: Utc::now(),
            }]])
            .into_connection();

        let response = send_get(router(Some(db)), "/api/hostpools").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body[0]["name"], "Pool-EastUS-02");
        assert_eq!(body[0]["status"], "online");
        assert_eq!(body[0]["total_capacity"], 150);
    }

    #[tokio::test]
    async fn test_dashboard_is_served_from_root() {
        let response = send_get(router(None), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_embedded_assets_and_unknown_paths() {
        let response = send_get(router(None), "/app.js").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.contains("javascript"));

        let response = send_get(router(None), "/does-not-exist.png").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
