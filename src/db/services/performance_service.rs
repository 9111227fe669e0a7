use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func}, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult,
    Order, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::db::entities::{performance_metric, session};

// --- PerformanceMetric Service Functions ---

/// One minute of samples averaged across every session sampled in it.
#[derive(FromQueryResult, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBucket {
    /// Minute label, `HH:MM`.
    pub time: String,
    pub cpu: f64,
    pub memory: f64,
    /// Distinct sessions that contributed samples.
    pub sessions: i64,
}

/// Returns at most `limit` per-minute buckets recorded at or after `since`,
/// oldest first. When there are more buckets than `limit`, the most recent
/// ones are kept.
pub async fn get_metric_buckets<C: ConnectionTrait>(
    db: &C,
    since: DateTime<Utc>,
    limit: u64,
) -> Result<Vec<MetricBucket>, DbErr> {
    let bucket_expr = Expr::cust("date_trunc('minute', \"performance_metrics\".\"timestamp\")");

    let mut buckets = performance_metric::Entity::find()
        .select_only()
        .column_as(
            Expr::cust(
                "to_char(date_trunc('minute', \"performance_metrics\".\"timestamp\"), 'HH24:MI')",
            ),
            "time",
        )
        .column_as(
            Expr::expr(Func::avg(Expr::col(performance_metric::Column::CpuUsage))),
            "cpu",
        )
        .column_as(
            Expr::expr(Func::avg(Expr::col(performance_metric::Column::MemoryUsage))),
            "memory",
        )
        .column_as(
            Expr::cust("COUNT(DISTINCT \"performance_metrics\".\"session_id\")"),
            "sessions",
        )
        .filter(performance_metric::Column::Timestamp.gte(since))
        .group_by(bucket_expr.clone())
        .order_by(bucket_expr, Order::Desc)
        .limit(limit)
        .into_model::<MetricBucket>()
        .all(db)
        .await?;

    // Queried newest-first so LIMIT keeps the latest buckets; charts want oldest-first.
    buckets.reverse();
    Ok(buckets)
}

/// Snapshots the current CPU/memory of each session into `performance_metrics`.
pub async fn record_session_samples<C: ConnectionTrait>(
    db: &C,
    sessions: &[session::Model],
) -> Result<usize, DbErr> {
    if sessions.is_empty() {
        return Ok(0);
    }

    let now = Utc::now();
    let rows = sessions.iter().map(|s| performance_metric::ActiveModel {
        session_id: Set(s.session_id),
        cpu_usage: Set(s.cpu_usage),
        memory_usage: Set(s.memory_usage),
        timestamp: Set(now),
        ..Default::default()
    });

    let inserted = performance_metric::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(inserted as usize)
}

/// Deletes samples older than `cutoff`. Returns the number of rows removed.
pub async fn purge_metrics_before<C: ConnectionTrait>(
    db: &C,
    cutoff: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = performance_metric::Entity::delete_many()
        .filter(performance_metric::Column::Timestamp.lt(cutoff))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::enums::SessionStatus;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn bucket_row(time: &str, cpu: f64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("time", Value::from(time)),
            ("cpu", Value::from(cpu)),
            ("memory", Value::from(50.0)),
            ("sessions", Value::from(2i64)),
        ])
    }

    #[tokio::test]
    async fn test_buckets_are_returned_oldest_first() {
        // The database hands back newest-first.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                bucket_row("10:02", 30.0),
                bucket_row("10:01", 20.0),
                bucket_row("10:00", 10.0),
            ]])
            .into_connection();

        let buckets = get_metric_buckets(&db, Utc::now() - Duration::hours(24), 48)
            .await
            .unwrap();

        let labels: Vec<&str> = buckets.iter().map(|b| b.time.as_str()).collect();
        assert_eq!(labels, vec!["10:00", "10:01", "10:02"]);
        assert_eq!(buckets[0].cpu, 10.0);

        let log = db.into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        assert!(sql.contains("GROUP BY date_trunc('minute'"));
        assert!(sql.contains("DESC"));
        assert!(sql.contains("LIMIT"));
    }

    #[tokio::test]
    async fn test_recording_nothing_skips_the_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert_eq!(record_session_samples(&db, &[]).await.unwrap(), 0);
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_recording_inserts_one_row_per_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 11, rows_affected: 2 }])
            .into_connection();
        let sessions: Vec<session::Model> = (1..=2)
            .map(|id| session::Model {
                session_id: id,
                user_id: 1,
                host_pool: "Pool-UKSouth-01".to_string(),
                status: SessionStatus::Active,
                cpu_usage: 35.2,
                memory_usage: 48.3,
                duration: 85,
                created_at: Utc::now(),
            })
            .collect();

        assert_eq!(record_session_samples(&db, &sessions).await.unwrap(), 2);

        let log = db.into_transaction_log();
        assert!(log[0].statements()[0].sql.starts_with("INSERT INTO \"performance_metrics\""));
    }

    #[tokio::test]
    async fn test_purge_reports_deleted_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 17 }])
            .into_connection();

        let removed = purge_metrics_before(&db, Utc::now() - Duration::hours(24)).await.unwrap();
        assert_eq!(removed, 17);
    }
}
