//! Terminal commands that drive the running service over its REST API.
//!
//! Every mutating command follows the widget's canonical flow: perform the
//! request, then re-fetch the authoritative task list and render it — on
//! failure too, so the output reconciles with server truth before the error
//! is surfaced.

pub mod client;

use anyhow::Result;
use serde_json::json;
use tracing::warn;

use crate::config::ServiceConfig;
use crate::storage::TaskRow;
use client::WidgetClient;

fn connect(config: &ServiceConfig) -> Result<WidgetClient> {
    let token = client::read_admin_token(&config.data_dir)?;
    WidgetClient::new(config.port, token)
}

fn render(tasks: &[TaskRow]) {
    if tasks.is_empty() {
        println!("No tasks yet.");
        return;
    }
    for task in tasks {
        let mark = if task.completed { "x" } else { " " };
        println!("[{mark}] #{id:<4} {desc}", id = task.id, desc = task.task_description);
    }
}

/// Re-fetch and render the canonical list. Best effort: a failed re-fetch is
/// logged, not fatal, so the original command outcome still decides the exit.
async fn refresh(widget: &WidgetClient) {
    match widget.list_tasks().await {
        Ok(tasks) => render(&tasks),
        Err(e) => warn!("could not refresh task list: {e:#}"),
    }
}

pub async fn list(config: &ServiceConfig, completed: Option<bool>) -> Result<()> {
    let widget = connect(config)?;
    let mut tasks = widget.list_tasks().await?;
    if let Some(flag) = completed {
        tasks.retain(|t| t.completed == flag);
    }
    render(&tasks);
    Ok(())
}

pub async fn add(config: &ServiceConfig, description: &str) -> Result<()> {
    let widget = connect(config)?;
    let outcome = widget.create_task(description).await.map(|_| ());
    refresh(&widget).await;
    outcome
}

pub async fn toggle(config: &ServiceConfig, id: i64) -> Result<()> {
    let widget = connect(config)?;
    let outcome = widget.toggle_task(id).await.map(|_| ());
    refresh(&widget).await;
    outcome
}

pub async fn done(config: &ServiceConfig, id: i64, completed: bool) -> Result<()> {
    let widget = connect(config)?;
    let outcome = widget
        .update_task(id, json!({ "completed": completed }))
        .await
        .map(|_| ());
    refresh(&widget).await;
    outcome
}

pub async fn rm(config: &ServiceConfig, id: i64) -> Result<()> {
    let widget = connect(config)?;
    let outcome = widget.delete_task(id).await;
    refresh(&widget).await;
    outcome
}

pub async fn clear_completed(config: &ServiceConfig) -> Result<()> {
    let widget = connect(config)?;
    let outcome = widget.clear_completed().await;
    refresh(&widget).await;
    outcome
}

pub async fn clear_all(config: &ServiceConfig) -> Result<()> {
    let widget = connect(config)?;
    let outcome = widget.clear_all().await;
    refresh(&widget).await;
    outcome
}

pub async fn lists(config: &ServiceConfig) -> Result<()> {
    let widget = connect(config)?;
    let index = widget.checklists().await?;
    if index.lists.is_empty() {
        println!("No predefined checklists available.");
        return Ok(());
    }
    for list in &index.lists {
        println!("{name:<20} {desc}", name = list.name, desc = list.description);
    }
    Ok(())
}

pub async fn import(config: &ServiceConfig, name: &str) -> Result<()> {
    let widget = connect(config)?;
    let outcome = widget.import_checklist(name).await;
    refresh(&widget).await;
    let outcome = outcome?;
    println!(
        "Imported {imported} task(s) from \"{name}\"{failures}.",
        imported = outcome.imported,
        failures = if outcome.failed > 0 {
            format!(", {} failed", outcome.failed)
        } else {
            String::new()
        }
    );
    Ok(())
}

pub async fn token(config: &ServiceConfig, value: Option<&str>) -> Result<()> {
    let widget = connect(config)?;
    match value {
        Some(token) => {
            widget.set_checklist_token(token).await?;
            println!("Checklist service token updated.");
        }
        None => match widget.get_checklist_token().await? {
            Some(token) => println!("{token}"),
            None => println!("Checklist service token is not configured."),
        },
    }
    Ok(())
}
