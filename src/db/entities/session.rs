use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::SessionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub session_id: i32,
    pub user_id: i32,
    /// Name of the host pool, not its id.
    pub host_pool: String,
    pub status: SessionStatus,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    /// Minutes connected.
    pub duration: i32,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::host_pool::Entity",
        from = "Column::HostPool",
        to = "super::host_pool::Column::Name"
    )]
    HostPool,
    #[sea_orm(has_many = "super::performance_metric::Entity")]
    PerformanceMetrics,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::host_pool::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HostPool.def()
    }
}

impl Related<super::performance_metric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceMetrics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
