// rest/routes/checklists.rs — Checklist proxy routes.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::checklists::{Checklist, ChecklistIndex};
use crate::error::ServiceError;
use crate::AppContext;

pub async fn list_checklists(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<ChecklistIndex>, ServiceError> {
    ctx.checklists.list_available().await.map(Json)
}

pub async fn get_checklist(
    State(ctx): State<Arc<AppContext>>,
    Path(name): Path<String>,
) -> Result<Json<Checklist>, ServiceError> {
    ctx.checklists.fetch(&name).await.map(Json)
}
