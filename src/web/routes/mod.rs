pub mod alert_routes;
pub mod health_routes;
pub mod host_pool_routes;
pub mod metrics_routes;
pub mod overview_routes;
pub mod session_routes;
pub mod user_routes;
