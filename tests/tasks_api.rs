//! End-to-end tests for the task REST endpoints.
//! Spins up the real router on a random local port and drives it over HTTP.

use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use checkd::{config::ServiceConfig, rest, AppContext};

struct TestService {
    base_url: String,
    token: String,
    _dir: TempDir,
}

async fn spawn_service() -> TestService {
    let dir = TempDir::new().unwrap();
    let config = ServiceConfig::new(
        None,
        Some(dir.path().to_path_buf()),
        Some("error".to_string()),
        None,
    );
    let ctx = AppContext::new(Arc::new(config)).await.unwrap();
    let token = ctx.admin_token.clone();
    let router = rest::build_router(ctx);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestService {
        base_url: format!("http://{addr}/api/v1"),
        token,
        _dir: dir,
    }
}

fn http() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_task(service: &TestService, description: &str) -> Value {
    http()
        .post(format!("{}/tasks", service.base_url))
        .header("X-Admin-Token", &service.token)
        .json(&json!({ "task_description": description }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn list_tasks(service: &TestService) -> Vec<Value> {
    http()
        .get(format!("{}/tasks", service.base_url))
        .header("X-Admin-Token", &service.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn widget_scenario_create_toggle_order_clear() {
    let service = spawn_service().await;

    // Create "Buy domain" → one open task.
    let buy = create_task(&service, "Buy domain").await;
    let tasks = list_tasks(&service).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["task_description"], "Buy domain");
    assert_eq!(tasks[0]["completed"], false);

    // Toggle it complete.
    let resp = http()
        .patch(format!("{}/tasks/{}", service.base_url, buy["id"]))
        .header("X-Admin-Token", &service.token)
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let tasks = list_tasks(&service).await;
    assert_eq!(tasks[0]["completed"], true);

    // A newer task lists first.
    create_task(&service, "Renew SSL").await;
    let tasks = list_tasks(&service).await;
    assert_eq!(tasks[0]["task_description"], "Renew SSL");
    assert_eq!(tasks[1]["task_description"], "Buy domain");

    // Clearing completed keeps only the open task.
    let resp = http()
        .delete(format!("{}/tasks/clear-completed", service.base_url))
        .header("X-Admin-Token", &service.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({ "deleted": true }));

    let tasks = list_tasks(&service).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["task_description"], "Renew SSL");
}

#[tokio::test]
async fn blank_description_is_rejected_and_nothing_is_stored() {
    let service = spawn_service().await;

    for bad in ["", "   \t ", "<br>"] {
        let resp = http()
            .post(format!("{}/tasks", service.base_url))
            .header("X-Admin-Token", &service.token)
            .json(&json!({ "task_description": bad }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "input {bad:?} should be rejected");
    }
    assert!(list_tasks(&service).await.is_empty());
}

#[tokio::test]
async fn patch_with_only_unknown_fields_returns_the_unchanged_task() {
    let service = spawn_service().await;
    let task = create_task(&service, "stable").await;

    let resp = http()
        .patch(format!("{}/tasks/{}", service.base_url, task["id"]))
        .header("X-Admin-Token", &service.token)
        .json(&json!({ "priority": "high", "color": "red" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["task_description"], "stable");
    assert_eq!(body["completed"], false);
    assert_eq!(body["updated_at"], task["updated_at"]);
}

#[tokio::test]
async fn completed_accepts_integer_form() {
    let service = spawn_service().await;
    let task = create_task(&service, "toggle me").await;

    let resp = http()
        .patch(format!("{}/tasks/{}", service.base_url, task["id"]))
        .header("X-Admin-Token", &service.token)
        .json(&json!({ "completed": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap()["completed"], true);
}

#[tokio::test]
async fn put_is_an_alias_for_patch() {
    let service = spawn_service().await;
    let task = create_task(&service, "old wording").await;

    let resp = http()
        .put(format!("{}/tasks/{}", service.base_url, task["id"]))
        .header("X-Admin-Token", &service.token)
        .json(&json!({ "task_description": "new wording" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.json::<Value>().await.unwrap()["task_description"],
        "new wording"
    );
}

#[tokio::test]
async fn missing_tasks_yield_404_idempotently() {
    let service = spawn_service().await;

    let resp = http()
        .get(format!("{}/tasks/999", service.base_url))
        .header("X-Admin-Token", &service.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    for _ in 0..2 {
        let resp = http()
            .delete(format!("{}/tasks/999", service.base_url))
            .header("X-Admin-Token", &service.token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }
}

#[tokio::test]
async fn clear_all_empties_the_list_and_creates_still_work() {
    let service = spawn_service().await;
    create_task(&service, "one").await;
    create_task(&service, "two").await;

    let resp = http()
        .delete(format!("{}/tasks/clear-all", service.base_url))
        .header("X-Admin-Token", &service.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(list_tasks(&service).await.is_empty());

    let task = create_task(&service, "fresh start").await;
    assert_eq!(task["task_description"], "fresh start");
}

#[tokio::test]
async fn completed_filter_narrows_the_list() {
    let service = spawn_service().await;
    let done = create_task(&service, "done").await;
    create_task(&service, "open").await;
    http()
        .patch(format!("{}/tasks/{}", service.base_url, done["id"]))
        .header("X-Admin-Token", &service.token)
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();

    let resp = http()
        .get(format!("{}/tasks?completed=true", service.base_url))
        .header("X-Admin-Token", &service.token)
        .send()
        .await
        .unwrap();
    let tasks: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["task_description"], "done");
}

#[tokio::test]
async fn every_endpoint_except_health_requires_the_admin_token() {
    let service = spawn_service().await;

    let unauthorized = [
        http().get(format!("{}/tasks", service.base_url)),
        http().post(format!("{}/tasks", service.base_url)),
        http().delete(format!("{}/tasks/clear-all", service.base_url)),
        http().get(format!("{}/checklists", service.base_url)),
        http().get(format!("{}/settings", service.base_url)),
    ];
    for request in unauthorized {
        let resp = request.json(&json!({})).send().await.unwrap();
        assert_eq!(resp.status(), 401);
    }

    // A wrong token is rejected the same way.
    let resp = http()
        .get(format!("{}/tasks", service.base_url))
        .header("X-Admin-Token", "wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Health stays open.
    let resp = http()
        .get(format!("{}/health", service.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap()["status"], "ok");
}
