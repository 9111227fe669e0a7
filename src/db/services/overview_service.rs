use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func}, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::db::entities::session;
use crate::db::enums::HostPoolStatus;
use crate::db::services::{count_active_users, count_host_pools};

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Sessions created today.
    pub total_sessions: i64,
    /// Sessions created today that are still active.
    pub active_sessions: i64,
    pub avg_cpu: f64,
    pub avg_memory: f64,
    /// Users with status `active`.
    pub total_users: i64,
    /// Host pools with status `online`.
    pub total_hosts: i64,
}

#[derive(FromQueryResult, Debug, Default)]
struct SessionTotals {
    total_sessions: i64,
    active_sessions: i64,
    avg_cpu: Option<f64>,
    avg_memory: Option<f64>,
}

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub async fn get_overview<C: ConnectionTrait>(db: &C) -> Result<Overview, DbErr> {
    let since = start_of_day(Utc::now());

    let totals = session::Entity::find()
        .select_only()
        .column_as(
            Expr::expr(Func::count(Expr::col(session::Column::SessionId))),
            "total_sessions",
        )
        .column_as(
            Expr::cust("COALESCE(SUM(CASE WHEN \"sessions\".\"status\" = 'active' THEN 1 ELSE 0 END), 0)"),
            "active_sessions",
        )
        .column_as(Expr::expr(Func::avg(Expr::col(session::Column::CpuUsage))), "avg_cpu")
        .column_as(
            Expr::expr(Func::avg(Expr::col(session::Column::MemoryUsage))),
            "avg_memory",
        )
        .filter(session::Column::CreatedAt.gte(since))
        .into_model::<SessionTotals>()
        .one(db)
        .await?
        .unwrap_or_default();

    let total_users = count_active_users(db).await?;
    let total_hosts = count_host_pools(db, Some(HostPoolStatus::Online)).await?;

    let total_sessions = totals.total_sessions.max(0);
    Ok(Overview {
        total_sessions,
        active_sessions: totals.active_sessions.clamp(0, total_sessions),
        avg_cpu: round2(totals.avg_cpu.unwrap_or(0.0)),
        avg_memory: round2(totals.avg_memory.unwrap_or(0.0)),
        total_users,
        total_hosts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn count(n: i64) -> Vec<BTreeMap<&'static str, Value>> {
        vec![BTreeMap::from([("count", Value::from(n))])]
    }

    #[test]
    fn test_start_of_day_truncates_to_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 17, 45, 12).unwrap();
        assert_eq!(start_of_day(now), Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_overview_combines_three_queries() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([
                ("total_sessions", Value::from(8i64)),
                ("active_sessions", Value::from(6i64)),
                ("avg_cpu", Value::from(Some(48.56789f64))),
                ("avg_memory", Value::from(Some(61.0f64))),
            ])]])
            .append_query_results([count(11)])
            .append_query_results([count(7)])
            .into_connection();

        let overview = get_overview(&db).await.unwrap();

        assert_eq!(
            overview,
            Overview {
                total_sessions: 8,
                active_sessions: 6,
                avg_cpu: 48.57,
                avg_memory: 61.0,
                total_users: 11,
                total_hosts: 7,
            }
        );
    }

    #[tokio::test]
    async fn test_overview_with_no_sessions_today() {
        let no_avg: Option<f64> = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([
                ("total_sessions", Value::from(0i64)),
                ("active_sessions", Value::from(0i64)),
                ("avg_cpu", Value::from(no_avg)),
                ("avg_memory", Value::from(no_avg)),
            ])]])
            .append_query_results([count(0)])
            .append_query_results([count(0)])
            .into_connection();

        let overview = get_overview(&db).await.unwrap();

        assert_eq!(overview.total_sessions, 0);
        assert_eq!(overview.avg_cpu, 0.0);
        assert!(overview.active_sessions <= overview.total_sessions);
    }

    #[test]
    fn test_overview_serializes_camel_case() {
        let json = serde_json::to_value(Overview {
            total_sessions: 1,
            active_sessions: 1,
            avg_cpu: 2.5,
            avg_memory: 3.5,
            total_users: 4,
            total_hosts: 5,
        })
        .unwrap();

        assert_eq!(json["totalSessions"], 1);
        assert_eq!(json["activeSessions"], 1);
        assert_eq!(json["totalHosts"], 5);
    }
}
