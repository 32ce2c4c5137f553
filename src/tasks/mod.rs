//! Task service — validation and business rules over the store.

pub mod sanitize;

use serde::{Deserialize, Deserializer};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::storage::{Storage, TaskRow};

/// Partial update body. Only the two allowed fields are recognized; anything
/// else a client sends is silently dropped during deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct TaskPatch {
    pub task_description: Option<String>,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub completed: Option<bool>,
}

/// Older widget builds send `completed` as 0/1 rather than a JSON boolean.
/// Either form is coerced to a boolean here; the store writes it back as 0/1.
fn bool_or_int<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|flag| match flag {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    }))
}

#[derive(Clone)]
pub struct TaskService {
    storage: Arc<Storage>,
}

impl TaskService {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Create a task from a raw description. The description is sanitized
    /// first; an empty result is a validation error and nothing is written.
    pub async fn create(&self, description: &str) -> Result<TaskRow, ServiceError> {
        let description = sanitize::sanitize_description(description);
        if description.is_empty() {
            return Err(ServiceError::validation("task description is required"));
        }
        self.storage
            .create_task(&description)
            .await
            .map_err(ServiceError::Persistence)
    }

    pub async fn get(&self, id: i64) -> Result<TaskRow, ServiceError> {
        self.storage
            .get_task(id)
            .await
            .map_err(ServiceError::Persistence)?
            .ok_or_else(|| ServiceError::not_found(format!("task {id} not found")))
    }

    pub async fn list(&self, completed: Option<bool>) -> Result<Vec<TaskRow>, ServiceError> {
        self.storage
            .list_tasks(completed)
            .await
            .map_err(ServiceError::Persistence)
    }

    /// Apply a partial update. Existence is checked before any write; a patch
    /// with no recognized fields succeeds and returns the unchanged task.
    pub async fn update(&self, id: i64, patch: TaskPatch) -> Result<TaskRow, ServiceError> {
        self.get(id).await?;

        let description = match patch.task_description.as_deref() {
            Some(raw) => {
                let clean = sanitize::sanitize_description(raw);
                if clean.is_empty() {
                    return Err(ServiceError::validation("task description cannot be empty"));
                }
                Some(clean)
            }
            None => None,
        };

        self.storage
            .update_task(id, description.as_deref(), patch.completed)
            .await
            .map_err(ServiceError::Persistence)?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self
            .storage
            .delete_task(id)
            .await
            .map_err(ServiceError::Persistence)?;
        if !deleted {
            return Err(ServiceError::not_found(format!("task {id} not found")));
        }
        Ok(())
    }

    /// Remove every completed task. Clearing when nothing is completed is
    /// still a success.
    pub async fn clear_completed(&self) -> Result<u64, ServiceError> {
        self.storage
            .delete_completed_tasks()
            .await
            .map_err(ServiceError::Persistence)
    }

    /// Remove every task.
    pub async fn clear_all(&self) -> Result<u64, ServiceError> {
        self.storage
            .delete_all_tasks()
            .await
            .map_err(ServiceError::Persistence)
    }
}
