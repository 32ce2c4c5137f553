pub mod auth;
pub mod checklists;
pub mod cli;
pub mod config;
pub mod error;
pub mod rest;
pub mod storage;
pub mod tasks;

use std::sync::Arc;

use anyhow::Result;
use checklists::ChecklistProxy;
use config::ServiceConfig;
use storage::Storage;
use tasks::TaskService;

/// Shared context for the REST layer: explicitly constructed dependencies,
/// no ambient global state. The store is built first, the service and proxy
/// are layered over it, and the HTTP layer gets the lot.
pub struct AppContext {
    pub config: Arc<ServiceConfig>,
    pub storage: Arc<Storage>,
    pub tasks: TaskService,
    pub checklists: ChecklistProxy,
    pub admin_token: String,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub async fn new(config: Arc<ServiceConfig>) -> Result<Arc<Self>> {
        let storage = Arc::new(Storage::new(&config.data_dir).await?);
        let tasks = TaskService::new(storage.clone());
        let checklists = ChecklistProxy::new(storage.clone(), &config.checklist)?;
        let admin_token = auth::get_or_create_admin_token(&config.data_dir)?;

        Ok(Arc::new(Self {
            config,
            storage,
            tasks,
            checklists,
            admin_token,
            started_at: std::time::Instant::now(),
        }))
    }
}
