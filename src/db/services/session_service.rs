use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func}, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};

use crate::db::entities::{session, user};
use crate::db::enums::SessionStatus;
use crate::db::services::CountRow;

/// A session row joined with the owning user's name.
#[derive(FromQueryResult, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionWithUser {
    pub session_id: i32,
    pub user_id: i32,
    pub username: String,
    pub host_pool: String,
    pub status: SessionStatus,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub duration: i32,
    pub created_at: DateTime<Utc>,
}

/// Most recent sessions (any status), newest first.
pub async fn get_recent_sessions<C: ConnectionTrait>(
    db: &C,
    limit: u64,
) -> Result<Vec<SessionWithUser>, DbErr> {
    session::Entity::find()
        .select_only()
        .columns([
            session::Column::SessionId,
            session::Column::UserId,
        ])
        .column(user::Column::Username)
        .columns([
            session::Column::HostPool,
            session::Column::Status,
            session::Column::CpuUsage,
            session::Column::MemoryUsage,
            session::Column::Duration,
            session::Column::CreatedAt,
        ])
        .join(JoinType::InnerJoin, session::Relation::User.def())
        .order_by_desc(session::Column::CreatedAt)
        .limit(limit)
        .into_model::<SessionWithUser>()
        .all(db)
        .await
}

pub async fn list_active_sessions<C: ConnectionTrait>(db: &C) -> Result<Vec<session::Model>, DbErr> {
    session::Entity::find()
        .filter(session::Column::Status.eq(SessionStatus::Active))
        .all(db)
        .await
}

/// Writes new usage figures for an active session. A session that was
/// disconnected in the meantime is left untouched (returns 0).
pub async fn update_session_usage<C: ConnectionTrait>(
    db: &C,
    session_id: i32,
    cpu_usage: f64,
    memory_usage: f64,
    duration: i32,
) -> Result<u64, DbErr> {
    let result = session::Entity::update_many()
        .col_expr(session::Column::CpuUsage, Expr::value(cpu_usage))
        .col_expr(session::Column::MemoryUsage, Expr::value(memory_usage))
        .col_expr(session::Column::Duration, Expr::value(duration))
        .filter(session::Column::SessionId.eq(session_id))
        .filter(session::Column::Status.eq(SessionStatus::Active))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn create_session<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    host_pool: &str,
    status: SessionStatus,
    cpu_usage: f64,
    memory_usage: f64,
    duration: i32,
) -> Result<session::Model, DbErr> {
    session::ActiveModel {
        user_id: Set(user_id),
        host_pool: Set(host_pool.to_string()),
        status: Set(status),
        cpu_usage: Set(cpu_usage),
        memory_usage: Set(memory_usage),
        duration: Set(duration),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Marks an active session disconnected. Returns the number of rows changed.
pub async fn disconnect_session<C: ConnectionTrait>(db: &C, session_id: i32) -> Result<u64, DbErr> {
    let result = session::Entity::update_many()
        .col_expr(session::Column::Status, Expr::value(SessionStatus::Disconnected))
        .filter(session::Column::SessionId.eq(session_id))
        .filter(session::Column::Status.eq(SessionStatus::Active))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Sessions currently occupying a host (active or idle).
pub async fn count_live_sessions<C: ConnectionTrait>(db: &C) -> Result<i64, DbErr> {
    let row = session::Entity::find()
        .select_only()
        .column_as(
            Expr::expr(Func::count(Expr::col(session::Column::SessionId))),
            "count",
        )
        .filter(session::Column::Status.is_in([SessionStatus::Active, SessionStatus::Idle]))
        .into_model::<CountRow>()
        .one(db)
        .await?;
    Ok(row.map(|r| r.count).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn session_row(id: i32, username: &str, status: &str) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("session_id", Value::from(id)),
            ("user_id", Value::from(1)),
            ("username", Value::from(username)),
            ("host_pool", Value::from("Pool-EastUS-02")),
            ("status", Value::from(status)),
            ("cpu_usage", Value::from(41.5)),
            ("memory_usage", Value::from(63.0)),
            ("duration", Value::from(12)),
            ("created_at", Value::from(Utc::now())),
        ])
    }

    #[tokio::test]
    async fn test_recent_sessions_carry_username_and_status() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                session_row(2, "sarah.williams", "active"),
                session_row(1, "mike.johnson", "disconnected"),
            ]])
            .into_connection();

        let sessions = get_recent_sessions(&db, 50).await.unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].username, "sarah.williams");
        assert_eq!(sessions[1].status, SessionStatus::Disconnected);

        let log = db.into_transaction_log();
        let sql = log[0].statements()[0].sql.clone();
        assert!(sql.contains("INNER JOIN \"users\""));
        assert!(sql.contains("ORDER BY \"sessions\".\"created_at\" DESC"));
        assert!(sql.contains("LIMIT"));
    }

    #[tokio::test]
    async fn test_update_only_touches_active_sessions() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();

        let changed = update_session_usage(&db, 7, 55.0, 40.0, 13).await.unwrap();
        assert_eq!(changed, 1);

        let log = db.into_transaction_log();
        let stmt = &log[0].statements()[0];
        assert!(stmt.sql.starts_with(r#"UPDATE "sessions" SET "cpu_usage" = $1, "memory_usage" = $2, "duration" = $3"#));
        assert!(stmt.sql.contains(r#""sessions"."status" = $5"#));
        let values = stmt.values.as_ref().unwrap();
        assert_eq!(values.0[0], Value::from(55.0f64));
        assert_eq!(values.0[2], Value::from(13i32));
        assert_eq!(values.0[4], Value::from("active"));
    }

    #[tokio::test]
    async fn test_count_live_sessions_defaults_to_zero() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        assert_eq!(count_live_sessions(&db).await.unwrap(), 0);
    }
}
