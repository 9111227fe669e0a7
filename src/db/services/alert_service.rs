use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func}, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::db::entities::alert;
use crate::db::enums::AlertSeverity;
use crate::db::services::CountRow;

/// Newest unresolved alerts first.
pub async fn get_unresolved_alerts<C: ConnectionTrait>(
    db: &C,
    limit: u64,
) -> Result<Vec<alert::Model>, DbErr> {
    alert::Entity::find()
        .filter(alert::Column::Resolved.eq(false))
        .order_by_desc(alert::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
}

pub async fn create_alert<C: ConnectionTrait>(
    db: &C,
    severity: AlertSeverity,
    message: &str,
    source: &str,
) -> Result<alert::Model, DbErr> {
    alert::ActiveModel {
        severity: Set(severity),
        message: Set(message.to_string()),
        source: Set(source.to_string()),
        resolved: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Unresolved alerts raised before `created_before`.
pub async fn list_resolvable_alerts<C: ConnectionTrait>(
    db: &C,
    created_before: DateTime<Utc>,
) -> Result<Vec<alert::Model>, DbErr> {
    alert::Entity::find()
        .filter(alert::Column::Resolved.eq(false))
        .filter(alert::Column::CreatedAt.lt(created_before))
        .all(db)
        .await
}

pub async fn resolve_alert<C: ConnectionTrait>(db: &C, alert_id: i32) -> Result<u64, DbErr> {
    let result = alert::Entity::update_many()
        .col_expr(alert::Column::Resolved, Expr::value(true))
        .filter(alert::Column::AlertId.eq(alert_id))
        .filter(alert::Column::Resolved.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count_unresolved_alerts<C: ConnectionTrait>(db: &C) -> Result<i64, DbErr> {
    let row = alert::Entity::find()
        .select_only()
        .column_as(Expr::expr(Func::count(Expr::col(alert::Column::AlertId))), "count")
        .filter(alert::Column::Resolved.eq(false))
        .into_model::<CountRow>()
        .one(db)
        .await?;
    Ok(row.map(|r| r.count).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_unresolved_query_filters_and_limits() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![alert::Model {
                alert_id: 4,
                severity: AlertSeverity::Critical,
                message: "Disk space threshold exceeded".to_string(),
                source: "Pool-EastUS-02".to_string(),
                resolved: false,
                created_at: Utc::now(),
            }]])
            .into_connection();

        let alerts = get_unresolved_alerts(&db, 20).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);

        let log = db.into_transaction_log();
        let stmt = &log[0].statements()[0];
        assert!(stmt.sql.contains(r#"WHERE "alerts"."resolved" = $1"#));
        assert!(stmt.sql.contains(r#"ORDER BY "alerts"."created_at" DESC"#));
        let values = stmt.values.as_ref().unwrap();
        assert_eq!(values.0[0], sea_orm::Value::from(false));
        assert!(stmt.sql.ends_with("LIMIT $2"));
    }

    #[tokio::test]
    async fn test_resolving_an_already_resolved_alert_changes_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }])
            .into_connection();

        assert_eq!(resolve_alert(&db, 3).await.unwrap(), 0);
    }
}
