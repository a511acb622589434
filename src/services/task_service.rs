use serde::{Deserialize, Deserializer};
use sqlx::SqlitePool;

use crate::database::models::Task;
use crate::database::tasks::TaskStore;
use crate::error::ApiError;

const DEFAULT_PRIORITY: &str = "medium";

/// Partial update payload. `description` distinguishes "absent" from
/// "provided as null/empty" so callers can clear it, while a provided-but-empty
/// `title` or `priority` is treated as absent and keeps the stored value.
/// This asymmetry is inherited API behavior, kept on purpose.
#[derive(Debug, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl TaskPatch {
    /// Merge this patch onto a stored task, producing the full field set to
    /// write back.
    fn apply(self, task: &Task) -> (String, Option<String>, bool, String) {
        let title = match self.title {
            Some(t) if !t.is_empty() => t,
            _ => task.title.clone(),
        };
        let description = match self.description {
            Some(d) => d,
            None => task.description.clone(),
        };
        let completed = self.completed.unwrap_or(task.completed);
        let priority = match self.priority {
            Some(p) if !p.is_empty() => p,
            _ => task.priority.clone(),
        };

        (title, description, completed, priority)
    }
}

/// Task CRUD, always scoped by the verified caller identity.
#[derive(Clone)]
pub struct TaskService {
    tasks: TaskStore,
}

impl TaskService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            tasks: TaskStore::new(pool),
        }
    }

    pub async fn list(&self, caller_id: i64) -> Result<Vec<Task>, ApiError> {
        Ok(self.tasks.owned_by(caller_id).list().await?)
    }

    pub async fn get(&self, caller_id: i64, task_id: i64) -> Result<Task, ApiError> {
        self.tasks
            .owned_by(caller_id)
            .get(task_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Task not found"))
    }

    pub async fn create(
        &self,
        caller_id: i64,
        title: Option<String>,
        description: Option<String>,
        priority: Option<String>,
    ) -> Result<Task, ApiError> {
        let title = match title {
            Some(t) if !t.is_empty() => t,
            _ => return Err(ApiError::validation("Title is required")),
        };
        let priority = priority.unwrap_or_else(|| DEFAULT_PRIORITY.to_string());

        let task = self
            .tasks
            .owned_by(caller_id)
            .create(&title, description.as_deref(), &priority)
            .await?;
        Ok(task)
    }

    pub async fn update(
        &self,
        caller_id: i64,
        task_id: i64,
        patch: TaskPatch,
    ) -> Result<Task, ApiError> {
        let owned = self.tasks.owned_by(caller_id);

        let current = owned
            .get(task_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Task not found"))?;

        let (title, description, completed, priority) = patch.apply(&current);

        owned
            .update(task_id, &title, description.as_deref(), completed, &priority)
            .await?
            .ok_or_else(|| ApiError::not_found("Task not found"))
    }

    pub async fn delete(&self, caller_id: i64, task_id: i64) -> Result<(), ApiError> {
        if self.tasks.owned_by(caller_id).delete(task_id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found("Task not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_service() -> TaskService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        crate::database::migrate(&pool).await.expect("migrate");
        TaskService::new(pool)
    }

    fn patch_json(body: serde_json::Value) -> TaskPatch {
        serde_json::from_value(body).expect("patch")
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let service = test_service().await;
        let task = service
            .create(1, Some("X".to_string()), None, None)
            .await
            .expect("create");

        assert_eq!(task.title, "X");
        assert!(!task.completed);
        assert_eq!(task.priority, "medium");
        assert_eq!(task.description, None);
    }

    #[tokio::test]
    async fn create_rejects_missing_or_empty_title() {
        let service = test_service().await;

        for title in [None, Some(String::new())] {
            let err = service.create(1, title, None, None).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.message(), "Title is required");
        }
    }

    #[tokio::test]
    async fn update_with_only_completed_keeps_other_fields() {
        let service = test_service().await;
        let task = service
            .create(
                1,
                Some("X".to_string()),
                Some("details".to_string()),
                Some("high".to_string()),
            )
            .await
            .expect("create");

        let updated = service
            .update(1, task.id, patch_json(serde_json::json!({ "completed": true })))
            .await
            .expect("update");

        assert!(updated.completed);
        assert_eq!(updated.title, "X");
        assert_eq!(updated.description.as_deref(), Some("details"));
        assert_eq!(updated.priority, "high");
    }

    #[tokio::test]
    async fn update_empty_title_keeps_stored_title() {
        let service = test_service().await;
        let task = service
            .create(1, Some("X".to_string()), None, None)
            .await
            .expect("create");

        let updated = service
            .update(1, task.id, patch_json(serde_json::json!({ "title": "" })))
            .await
            .expect("update");
        assert_eq!(updated.title, "X");
    }

    #[tokio::test]
    async fn update_can_clear_description() {
        let service = test_service().await;
        let task = service
            .create(1, Some("X".to_string()), Some("details".to_string()), None)
            .await
            .expect("create");

        // Explicit empty string is applied, unlike an absent field
        let updated = service
            .update(1, task.id, patch_json(serde_json::json!({ "description": "" })))
            .await
            .expect("update");
        assert_eq!(updated.description.as_deref(), Some(""));

        let cleared = service
            .update(
                1,
                task.id,
                patch_json(serde_json::json!({ "description": null })),
            )
            .await
            .expect("update");
        assert_eq!(cleared.description, None);
    }

    #[tokio::test]
    async fn cross_user_access_is_not_found() {
        let service = test_service().await;
        let task = service
            .create(1, Some("mine".to_string()), None, None)
            .await
            .expect("create");

        let get = service.get(2, task.id).await.unwrap_err();
        let update = service
            .update(2, task.id, TaskPatch::default())
            .await
            .unwrap_err();
        let delete = service.delete(2, task.id).await.unwrap_err();

        for err in [get, update, delete] {
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
            assert_eq!(err.message(), "Task not found");
        }
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let service = test_service().await;
        let task = service
            .create(1, Some("X".to_string()), None, None)
            .await
            .expect("create");

        service.delete(1, task.id).await.expect("first delete");
        let err = service.delete(1, task.id).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
