use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func, NullOrdering},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, JoinType,
    Order, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};

use crate::db::entities::{session, user};
use crate::db::enums::UserStatus;
use crate::db::services::CountRow;

// --- User Service Functions ---

/// A user with the number of sessions they have ever opened.
#[derive(FromQueryResult, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub status: UserStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub total_sessions: i64,
}

/// Users ordered by most recent login (never-logged-in users last).
pub async fn get_user_activity<C: ConnectionTrait>(
    db: &C,
    limit: u64,
) -> Result<Vec<UserActivity>, DbErr> {
    user::Entity::find()
        .select_only()
        .columns([
            user::Column::UserId,
            user::Column::Username,
            user::Column::Email,
            user::Column::Status,
            user::Column::LastLogin,
        ])
        .column_as(
            Expr::expr(Func::count(Expr::col((
                session::Entity,
                session::Column::SessionId,
            )))),
            "total_sessions",
        )
        .join(JoinType::LeftJoin, user::Relation::Sessions.def())
        .group_by(user::Column::UserId)
        .order_by_with_nulls(user::Column::LastLogin, Order::Desc, NullOrdering::Last)
        .limit(limit)
        .into_model::<UserActivity>()
        .all(db)
        .await
}

pub async fn list_active_users<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Status.eq(UserStatus::Active))
        .all(db)
        .await
}

pub async fn count_active_users<C: ConnectionTrait>(db: &C) -> Result<i64, DbErr> {
    let row = user::Entity::find()
        .select_only()
        .column_as(Expr::expr(Func::count(Expr::col(user::Column::UserId))), "count")
        .filter(user::Column::Status.eq(UserStatus::Active))
        .into_model::<CountRow>()
        .one(db)
        .await?;
    Ok(row.map(|r| r.count).unwrap_or(0))
}

/// Creates a user.
pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: &str,
    status: UserStatus,
    last_login: Option<DateTime<Utc>>,
) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        status: Set(status),
        last_login: Set(last_login),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
