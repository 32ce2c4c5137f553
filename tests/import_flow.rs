//! Tests for the client-side checklist import workflow: strictly sequential
//! creates in checklist order, with partial success accepted.

use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use checkd::cli::client::WidgetClient;
use checkd::{config::ServiceConfig, rest, AppContext};

async fn spawn_service(remote_url: &str) -> (WidgetClient, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut config = ServiceConfig::new(
        None,
        Some(dir.path().to_path_buf()),
        Some("error".to_string()),
        None,
    );
    config.checklist.base_url = remote_url.to_string();
    config.checklist.api_token = Some("tok-1".to_string());

    let ctx = AppContext::new(Arc::new(config)).await.unwrap();
    let token = ctx.admin_token.clone();
    let router = rest::build_router(ctx);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let widget = WidgetClient::with_base_url(format!("http://{addr}/api/v1"), token).unwrap();
    (widget, dir)
}

async fn mount_checklist(remote: &MockServer, name: &str, tasks: &[&str]) {
    Mock::given(method("GET"))
        .and(query_param("list", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": name,
            "description": "test list",
            "tasks": tasks,
        })))
        .mount(remote)
        .await;
}

#[tokio::test]
async fn import_preserves_checklist_order() {
    let remote = MockServer::start().await;
    mount_checklist(&remote, "launch", &["A", "B", "C"]).await;
    let (widget, _dir) = spawn_service(&remote.uri()).await;

    let outcome = widget.import_checklist("launch").await.unwrap();
    assert_eq!(outcome.imported, 3);
    assert_eq!(outcome.failed, 0);

    // The list renders newest-first, so creation order is the reverse.
    let tasks = widget.list_tasks().await.unwrap();
    let descriptions: Vec<_> = tasks.iter().map(|t| t.task_description.as_str()).collect();
    assert_eq!(descriptions, ["C", "B", "A"]);
}

#[tokio::test]
async fn one_failed_item_does_not_abort_the_rest() {
    let remote = MockServer::start().await;
    // The middle item sanitizes to nothing and is rejected by the service.
    mount_checklist(&remote, "flaky", &["A", "   ", "C"]).await;
    let (widget, _dir) = spawn_service(&remote.uri()).await;

    let outcome = widget.import_checklist("flaky").await.unwrap();
    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.failed, 1);

    let tasks = widget.list_tasks().await.unwrap();
    let descriptions: Vec<_> = tasks.iter().map(|t| t.task_description.as_str()).collect();
    assert_eq!(descriptions, ["C", "A"]);
}

#[tokio::test]
async fn import_appends_to_existing_tasks() {
    let remote = MockServer::start().await;
    mount_checklist(&remote, "launch", &["A", "B"]).await;
    let (widget, _dir) = spawn_service(&remote.uri()).await;

    widget.create_task("pre-existing").await.unwrap();
    widget.import_checklist("launch").await.unwrap();

    let tasks = widget.list_tasks().await.unwrap();
    let descriptions: Vec<_> = tasks.iter().map(|t| t.task_description.as_str()).collect();
    assert_eq!(descriptions, ["B", "A", "pre-existing"]);
}

#[tokio::test]
async fn deleting_an_already_deleted_task_is_success_for_the_client() {
    let remote = MockServer::start().await;
    let (widget, _dir) = spawn_service(&remote.uri()).await;

    let task = widget.create_task("going away").await.unwrap();
    widget.delete_task(task.id).await.unwrap();
    // The server now answers 404; the client still treats it as done.
    widget.delete_task(task.id).await.unwrap();

    assert!(widget.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn toggle_is_sugar_over_partial_update() {
    let remote = MockServer::start().await;
    let (widget, _dir) = spawn_service(&remote.uri()).await;

    let task = widget.create_task("flip me").await.unwrap();
    let toggled = widget.toggle_task(task.id).await.unwrap();
    assert!(toggled.completed);
    let toggled = widget.toggle_task(task.id).await.unwrap();
    assert!(!toggled.completed);
}
