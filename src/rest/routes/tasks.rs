// rest/routes/tasks.rs — Task REST routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::storage::TaskRow;
use crate::tasks::TaskPatch;
use crate::AppContext;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub completed: Option<bool>,
}

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TaskRow>>, ServiceError> {
    ctx.tasks.list(query.completed).await.map(Json)
}

pub async fn get_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskRow>, ServiceError> {
    ctx.tasks.get(id).await.map(Json)
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub task_description: String,
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<Json<TaskRow>, ServiceError> {
    ctx.tasks.create(&body.task_description).await.map(Json)
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<TaskRow>, ServiceError> {
    ctx.tasks.update(id, patch).await.map(Json)
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ServiceError> {
    ctx.tasks.delete(id).await?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn clear_completed(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, ServiceError> {
    ctx.tasks.clear_completed().await?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn clear_all(State(ctx): State<Arc<AppContext>>) -> Result<Json<Value>, ServiceError> {
    ctx.tasks.clear_all().await?;
    Ok(Json(json!({ "deleted": true })))
}
