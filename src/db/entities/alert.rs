use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::AlertSeverity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub alert_id: i32,
    pub severity: AlertSeverity,
    pub message: String,
    /// Host pool name, or "System".
    pub source: String,
    pub resolved: bool,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
