//! The `services` module is the only place that talks SQL.
//!
//! Each sub-module covers one table (or one aggregate view over several
//! tables) and exposes plain async functions taking a `ConnectionTrait`
//! handle. HTTP handlers, the simulator and the seeder all go through here.
//! Public items are re-exported so callers can use `crate::db::services::*`.

use sea_orm::FromQueryResult;

pub mod alert_service;
pub mod host_pool_service;
pub mod overview_service;
pub mod performance_service;
pub mod session_service;
pub mod user_service;

pub use alert_service::*;
pub use host_pool_service::*;
pub use overview_service::*;
pub use performance_service::*;
pub use session_service::*;
pub use user_service::*;

/// Single `COUNT(..)` result aliased as `count`.
#[derive(FromQueryResult, Debug)]
pub(crate) struct CountRow {
    pub count: i64,
}
