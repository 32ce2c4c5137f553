//! Lightweight REST client for CLI commands.
//!
//! CLI subcommands (`checkd list`, `checkd import`, etc.) use this to talk to
//! the running service with the admin token. The client never trusts its own
//! view of the task list: after every mutation the caller is expected to
//! re-fetch the authoritative list via [`WidgetClient::list_tasks`].

use anyhow::{bail, Context as _, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::warn;

use crate::checklists::{Checklist, ChecklistIndex};
use crate::storage::TaskRow;

/// Outcome of a checklist import. Partial success is expected and accepted:
/// a failed item is skipped, never rolled back.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub imported: usize,
    pub failed: usize,
}

/// A short-lived client for CLI-to-service REST calls.
pub struct WidgetClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl WidgetClient {
    /// Create a client targeting the service on the given port with the given
    /// admin token.
    pub fn new(port: u16, token: String) -> Result<Self> {
        Self::with_base_url(format!("http://127.0.0.1:{port}/api/v1"), token)
    }

    pub fn with_base_url(base_url: String, token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url,
            token,
            client,
        })
    }

    // ─── Tasks ──────────────────────────────────────────────────────────────

    pub async fn list_tasks(&self) -> Result<Vec<TaskRow>> {
        let response = self
            .client
            .get(format!("{}/tasks", self.base_url))
            .header("X-Admin-Token", &self.token)
            .send()
            .await
            .context("is the service running?")?;
        Self::decode(response).await
    }

    pub async fn create_task(&self, description: &str) -> Result<TaskRow> {
        let response = self
            .client
            .post(format!("{}/tasks", self.base_url))
            .header("X-Admin-Token", &self.token)
            .json(&json!({ "task_description": description }))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn update_task(&self, id: i64, patch: Value) -> Result<TaskRow> {
        let response = self
            .client
            .patch(format!("{}/tasks/{id}", self.base_url))
            .header("X-Admin-Token", &self.token)
            .json(&patch)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Flip a task's completed flag. Sugar over the generic partial update:
    /// read the current state from the list, then send the inverse.
    pub async fn toggle_task(&self, id: i64) -> Result<TaskRow> {
        let tasks = self.list_tasks().await?;
        let task = tasks
            .iter()
            .find(|t| t.id == id)
            .with_context(|| format!("task {id} not found"))?;
        self.update_task(id, json!({ "completed": !task.completed }))
            .await
    }

    /// Delete a task. A 404 from the server means it is already gone, which
    /// is the outcome the caller wanted — treated as success.
    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/tasks/{id}", self.base_url))
            .header("X-Admin-Token", &self.token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::decode::<Value>(response).await.map(|_| ())
    }

    pub async fn clear_completed(&self) -> Result<()> {
        self.delete_at("tasks/clear-completed").await
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.delete_at("tasks/clear-all").await
    }

    async fn delete_at(&self, path: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/{path}", self.base_url))
            .header("X-Admin-Token", &self.token)
            .send()
            .await?;
        Self::decode::<Value>(response).await.map(|_| ())
    }

    // ─── Checklists ─────────────────────────────────────────────────────────

    pub async fn checklists(&self) -> Result<ChecklistIndex> {
        let response = self
            .client
            .get(format!("{}/checklists", self.base_url))
            .header("X-Admin-Token", &self.token)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn checklist(&self, name: &str) -> Result<Checklist> {
        let response = self
            .client
            .get(format!("{}/checklists/{name}", self.base_url))
            .header("X-Admin-Token", &self.token)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Import a named checklist by creating its tasks one at a time, each
    /// create awaited before the next begins. Creation order — and therefore
    /// the resulting task order — follows the checklist. A failed item is
    /// logged and skipped; the rest of the sequence still runs.
    pub async fn import_checklist(&self, name: &str) -> Result<ImportOutcome> {
        let checklist = self.checklist(name).await?;
        let total = checklist.tasks.len();

        let mut outcome = ImportOutcome::default();
        for (index, description) in checklist.tasks.iter().enumerate() {
            match self.create_task(description).await {
                Ok(_) => outcome.imported += 1,
                Err(e) => {
                    outcome.failed += 1;
                    warn!(
                        item = index + 1,
                        total,
                        "failed to import \"{description}\": {e:#}"
                    );
                }
            }
        }
        Ok(outcome)
    }

    // ─── Settings ───────────────────────────────────────────────────────────

    pub async fn get_checklist_token(&self) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/settings", self.base_url))
            .header("X-Admin-Token", &self.token)
            .send()
            .await?;
        let body: Value = Self::decode(response).await?;
        Ok(body["checklist_api_token"]
            .as_str()
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    pub async fn set_checklist_token(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/settings", self.base_url))
            .header("X-Admin-Token", &self.token)
            .json(&json!({ "checklist_api_token": token }))
            .send()
            .await?;
        Self::decode::<Value>(response).await.map(|_| ())
    }

    // ─── Helpers ────────────────────────────────────────────────────────────

    /// Decode a success body, or surface the server's error message.
    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v["error"].as_str().map(str::to_string))
            .unwrap_or_else(|| format!("service returned {status}"));
        bail!("{message}");
    }
}

/// Read the admin token from the service's data directory.
///
/// Returns an error if the file does not exist (service not yet started).
pub fn read_admin_token(data_dir: &std::path::Path) -> Result<String> {
    let token_path = data_dir.join("admin_token");
    let token = std::fs::read_to_string(&token_path).with_context(|| {
        format!(
            "could not read admin token from {path}\n  Has the service been started at least once?",
            path = token_path.display()
        )
    })?;
    Ok(token.trim().to_owned())
}
