//! Remote checklist proxy.
//!
//! The checklist service hosts named, predefined task lists that an
//! administrator can import into the widget. This module fetches them on
//! demand — no caching, no retries — and folds every transport-level failure
//! (unreachable host, non-200, malformed body) into the single `Upstream`
//! error class. The caller never learns more than "service unavailable";
//! the cause is logged where the error is rendered.

use anyhow::anyhow;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ChecklistConfig;
use crate::error::ServiceError;
use crate::storage::Storage;

/// Settings key under which the runtime-editable access token is stored.
pub const SETTING_API_TOKEN: &str = "checklist_api_token";

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistSummary {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistIndex {
    pub lists: Vec<ChecklistSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    pub name: String,
    pub description: String,
    /// Ordered task descriptions, imported in this order.
    pub tasks: Vec<String>,
}

// ─── Proxy ───────────────────────────────────────────────────────────────────

pub struct ChecklistProxy {
    storage: Arc<Storage>,
    base_url: String,
    fallback_token: Option<String>,
    client: reqwest::Client,
}

impl ChecklistProxy {
    pub fn new(storage: Arc<Storage>, config: &ChecklistConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            storage,
            base_url: config.base_url.clone(),
            fallback_token: config.api_token.clone(),
            client,
        })
    }

    /// List the available checklists: `GET {base_url}`.
    pub async fn list_available(&self) -> Result<ChecklistIndex, ServiceError> {
        let token = self.token().await?;
        self.fetch_json(None, &token).await
    }

    /// Fetch one named checklist: `GET {base_url}?list={name}`.
    pub async fn fetch(&self, name: &str) -> Result<Checklist, ServiceError> {
        let token = self.token().await?;
        self.fetch_json(Some(name), &token).await
    }

    /// Resolve the access token, preferring the settings store over the
    /// config file. Failing here — before any request is built — is what
    /// keeps an unconfigured install fully offline.
    async fn token(&self) -> Result<String, ServiceError> {
        let stored = self
            .storage
            .get_setting(SETTING_API_TOKEN)
            .await
            .map_err(ServiceError::Persistence)?;
        stored
            .filter(|t| !t.is_empty())
            .or_else(|| self.fallback_token.clone().filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                ServiceError::unauthorized("checklist service token is not configured")
            })
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        list: Option<&str>,
        token: &str,
    ) -> Result<T, ServiceError> {
        let mut request = self
            .client
            .get(&self.base_url)
            .header("X-Auth-Token", token);
        if let Some(list) = list {
            request = request.query(&[("list", list)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(anyhow!(e).context("request failed")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Upstream(anyhow!(
                "checklist service returned {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Upstream(anyhow!(e).context("invalid response body")))
    }
}
