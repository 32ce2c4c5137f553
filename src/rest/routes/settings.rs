// rest/routes/settings.rs — Admin settings routes.
//
// The one setting is the remote checklist service token. Removing it (empty
// string or null) disables the checklist-import feature; the task endpoints
// are unaffected.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::checklists::SETTING_API_TOKEN;
use crate::error::ServiceError;
use crate::tasks::sanitize::sanitize_description;
use crate::AppContext;

pub async fn get_settings(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, ServiceError> {
    let token = ctx
        .storage
        .get_setting(SETTING_API_TOKEN)
        .await
        .map_err(ServiceError::Persistence)?;
    Ok(Json(json!({ "checklist_api_token": token })))
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub checklist_api_token: Option<String>,
}

pub async fn update_settings(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<Value>, ServiceError> {
    let token = sanitize_description(&body.checklist_api_token.unwrap_or_default());
    ctx.storage
        .set_setting(SETTING_API_TOKEN, &token)
        .await
        .map_err(ServiceError::Persistence)?;
    Ok(Json(json!({ "checklist_api_token": token })))
}
