use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func}, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::db::entities::host_pool;
use crate::db::enums::HostPoolStatus;
use crate::db::services::CountRow;

// --- HostPool Service Functions ---

/// All host pools ordered by name.
pub async fn get_all_host_pools<C: ConnectionTrait>(db: &C) -> Result<Vec<host_pool::Model>, DbErr> {
    host_pool::Entity::find()
        .order_by_asc(host_pool::Column::Name)
        .all(db)
        .await
}

pub async fn list_online_host_pools<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<host_pool::Model>, DbErr> {
    host_pool::Entity::find()
        .filter(host_pool::Column::Status.eq(HostPoolStatus::Online))
        .all(db)
        .await
}

/// Writes new utilisation figures and stamps `last_updated`.
/// Callers are responsible for keeping `current_load` within capacity.
pub async fn update_host_pool_usage<C: ConnectionTrait>(
    db: &C,
    host_pool_id: i32,
    cpu_usage: f64,
    memory_usage: f64,
    current_load: i32,
) -> Result<u64, DbErr> {
    let result = host_pool::Entity::update_many()
        .col_expr(host_pool::Column::CpuUsage, Expr::value(cpu_usage))
        .col_expr(host_pool::Column::MemoryUsage, Expr::value(memory_usage))
        .col_expr(host_pool::Column::CurrentLoad, Expr::value(current_load))
        .col_expr(host_pool::Column::LastUpdated, Expr::value(Utc::now()))
        .filter(host_pool::Column::HostPoolId.eq(host_pool_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

#[allow(clippy::too_many_arguments)]
pub async fn create_host_pool<C: ConnectionTrait>(
    db: &C,
    name: &str,
    region: &str,
    status: HostPoolStatus,
    total_capacity: i32,
    current_load: i32,
    cpu_usage: f64,
    memory_usage: f64,
) -> Result<host_pool::Model, DbErr> {
    host_pool::ActiveModel {
        name: Set(name.to_string()),
        region: Set(region.to_string()),
        status: Set(status),
        total_capacity: Set(total_capacity),
        current_load: Set(current_load.clamp(0, total_capacity.max(0))),
        cpu_usage: Set(cpu_usage),
        memory_usage: Set(memory_usage),
        last_updated: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn count_host_pools<C: ConnectionTrait>(
    db: &C,
    status: Option<HostPoolStatus>,
) -> Result<i64, DbErr> {
    let mut query = host_pool::Entity::find().select_only().column_as(
        Expr::expr(Func::count(Expr::col(host_pool::Column::HostPoolId))),
        "count",
    );
    if let Some(status) = status {
        query = query.filter(host_pool::Column::Status.eq(status));
    }
    let row = query.into_model::<CountRow>().one(db).await?;
    Ok(row.map(|r| r.count).unwrap_or(0))
}
