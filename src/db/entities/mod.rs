//! SeaORM entities for the fleet schema.
//!
//! One module per table. The prelude re-exports each entity and its
//! companion types under distinct names.

pub mod alert;
pub mod host_pool;
pub mod performance_metric;
pub mod session;
pub mod user;

pub mod prelude {
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;

    pub use super::host_pool::Entity as HostPool;
    pub use super::host_pool::Model as HostPoolModel;
    pub use super::host_pool::ActiveModel as HostPoolActiveModel;
    pub use super::host_pool::Column as HostPoolColumn;

    pub use super::session::Entity as Session;
    pub use super::session::Model as SessionModel;
    pub use super::session::ActiveModel as SessionActiveModel;
    pub use super::session::Column as SessionColumn;

    pub use super::performance_metric::Entity as PerformanceMetric;
    pub use super::performance_metric::Model as PerformanceMetricModel;
    pub use super::performance_metric::ActiveModel as PerformanceMetricActiveModel;
    pub use super::performance_metric::Column as PerformanceMetricColumn;

    pub use super::alert::Entity as Alert;
    pub use super::alert::Model as AlertModel;
    pub use super::alert::ActiveModel as AlertActiveModel;
    pub use super::alert::Column as AlertColumn;
}
