use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A task record. Serialized with camelCase field names to match the wire
/// format clients already depend on.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
