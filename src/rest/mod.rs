// rest/mod.rs — REST API server.
//
// Axum HTTP server, local only unless a wider bind address is configured.
// Every endpoint except health sits behind the admin-token check, so an
// unauthorized request is rejected before any service or proxy code runs.
//
// Endpoints:
//   GET    /api/v1/tasks
//   POST   /api/v1/tasks
//   GET    /api/v1/tasks/{id}
//   PATCH  /api/v1/tasks/{id}       (PUT accepted as an alias)
//   DELETE /api/v1/tasks/{id}
//   DELETE /api/v1/tasks/clear-completed
//   DELETE /api/v1/tasks/clear-all
//   GET    /api/v1/checklists
//   GET    /api/v1/checklists/{name}
//   GET    /api/v1/settings
//   PUT    /api/v1/settings
//   GET    /api/v1/health           (no auth)

pub mod routes;

use anyhow::Result;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::auth;
use crate::error::ServiceError;
use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let admin = Router::new()
        // Tasks
        .route(
            "/api/v1/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        // Static segments must be registered alongside the {id} capture;
        // the router prefers them over the parameter match.
        .route(
            "/api/v1/tasks/clear-completed",
            delete(routes::tasks::clear_completed),
        )
        .route("/api/v1/tasks/clear-all", delete(routes::tasks::clear_all))
        .route(
            "/api/v1/tasks/{id}",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        // Checklists
        .route("/api/v1/checklists", get(routes::checklists::list_checklists))
        .route(
            "/api/v1/checklists/{name}",
            get(routes::checklists::get_checklist),
        )
        // Settings
        .route(
            "/api/v1/settings",
            get(routes::settings::get_settings).put(routes::settings::update_settings),
        )
        .layer(middleware::from_fn_with_state(ctx.clone(), require_admin));

    Router::new()
        // Health (no auth)
        .route("/api/v1/health", get(routes::health::health))
        .merge(admin)
        // The widget is served from the CMS origin, not ours.
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

async fn require_admin(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if !auth::request_is_authorized(request.headers(), &ctx.admin_token) {
        return Err(ServiceError::unauthorized("administrator token required"));
    }
    Ok(next.run(request).await)
}
