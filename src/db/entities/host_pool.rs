use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::HostPoolStatus;

/// A named pool of session hosts. `current_load` never exceeds `total_capacity`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "host_pools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub host_pool_id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub region: String,
    pub status: HostPoolStatus,
    pub total_capacity: i32,
    pub current_load: i32,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub last_updated: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
