use chrono::Utc;
use sqlx::SqlitePool;

use super::models::Task;

/// Task store. All row access goes through [`OwnedTasks`], which pins every
/// query to a single owner id so the ownership filter cannot be forgotten at
/// a call site.
#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Scope all subsequent operations to the given owner.
    pub fn owned_by(&self, owner_id: i64) -> OwnedTasks<'_> {
        OwnedTasks {
            pool: &self.pool,
            owner_id,
        }
    }
}

/// A view of the task table restricted to one owner. Rows belonging to any
/// other user are invisible through this handle: lookups of foreign ids
/// behave exactly like lookups of ids that do not exist.
pub struct OwnedTasks<'a> {
    pool: &'a SqlitePool,
    owner_id: i64,
}

impl OwnedTasks<'_> {
    /// All tasks for this owner, newest-created first.
    pub async fn list(&self) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(self.owner_id)
        .fetch_all(self.pool)
        .await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(self.owner_id)
            .fetch_optional(self.pool)
            .await
    }

    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        priority: &str,
    ) -> Result<Task, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, description, completed, priority, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(false)
        .bind(priority)
        .bind(self.owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
    }

    /// Write back the full mutable field set. Field merge policy lives in the
    /// task service; the store only guarantees the ownership filter.
    pub async fn update(
        &self,
        id: i64,
        title: &str,
        description: Option<&str>,
        completed: bool,
        priority: &str,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET title = ?, description = ?, completed = ?, priority = ?, updated_at = ?
             WHERE id = ? AND user_id = ?
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(completed)
        .bind(priority)
        .bind(Utc::now())
        .bind(id)
        .bind(self.owner_id)
        .fetch_optional(self.pool)
        .await
    }

    /// Returns true when a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(self.owner_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
