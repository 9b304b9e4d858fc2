//! Single-task operations: detail, update, create, plus the member list.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::clickup::ClickUpClient;
use crate::config::Config;
use crate::fields::date_from_timestamp;
use crate::models::{is_empty_value, value_as_i64, CreatedTask, Layer, TaskDetail};
use crate::patch::{date_patch, DateInput, Patch};
use crate::secondary::{best_effort, write_hemisphere, write_publish_date};
use crate::{Error, Result};

// =============================================================================
// Detail
// =============================================================================

/// One task as ClickUp returns it, without its empty custom fields, plus the
/// normalized dates and, when the list lookup succeeds, the statuses it can
/// move to.
pub async fn get_task_detail(client: &ClickUpClient, task_id: &str) -> Result<TaskDetail> {
    let task_id = require_id(task_id)?;
    let mut task = client
        .get_task(task_id)
        .await
        .map_err(Error::into_read_failure)?;

    if let Some(Value::Array(fields)) = task.get_mut("custom_fields") {
        fields.retain(|field| !is_empty_value(field.get("value").unwrap_or(&Value::Null)));
    }

    let has_description = task
        .get("description")
        .is_some_and(|d| !is_empty_value(d));
    if !has_description {
        if let Some(text) = task.get("text_content").filter(|t| !is_empty_value(t)).cloned() {
            task.insert("description".to_string(), text);
        }
    }

    let list_id = task
        .get("list")
        .and_then(|list| list.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let statuses = match list_id {
        Some(list_id) => best_effort("list statuses", async {
            client.get_list(&list_id).await.map(|l| l.statuses)
        })
        .await,
        None => None,
    };

    let date = |key: &str| {
        task.get(key)
            .and_then(value_as_i64)
            .and_then(date_from_timestamp)
    };

    Ok(TaskDetail {
        start_date: date("start_date"),
        due_date: date("due_date"),
        statuses,
        task,
    })
}

// =============================================================================
// Update
// =============================================================================

/// Body of the `update` action. Attributes missing from the JSON are left
/// alone; attributes sent as `null` are cleared.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub id: String,
    #[serde(default)]
    pub status: Patch<String>,
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub start_date: Patch<DateInput>,
    #[serde(default)]
    pub due_date: Patch<DateInput>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub publish_date: Patch<DateInput>,
    #[serde(default)]
    pub publish_date_field_id: Option<String>,
}

impl UpdateTaskRequest {
    /// The sparse `PUT /task/{id}` body.
    pub fn task_patch(&self) -> Map<String, Value> {
        let mut patch = Map::new();

        let text = |p: &Patch<String>| {
            p.as_update()
                .map(|update| update.map(|s| Value::from(s.as_str())).unwrap_or(Value::Null))
        };

        let attributes = [
            ("name", text(&self.name)),
            ("status", text(&self.status)),
            ("description", text(&self.description)),
            ("start_date", date_patch(&self.start_date)),
            ("due_date", date_patch(&self.due_date)),
        ];
        for (key, value) in attributes {
            if let Some(value) = value {
                patch.insert(key.to_string(), value);
            }
        }

        patch
    }
}

/// Apply an update. Only the task write can fail the call; the Publish Date
/// field is written best-effort afterwards when the request mentions it.
pub async fn update_task(
    client: &ClickUpClient,
    config: &Config,
    request: &UpdateTaskRequest,
) -> Result<()> {
    let task_id = require_id(&request.id)?;

    let patch = request.task_patch();
    if !patch.is_empty() {
        client.update_task(task_id, &patch).await?;
        info!(task_id, keys = patch.len(), "Updated task");
    }

    if let Some(publish_date) = request.publish_date.as_update() {
        let field_id = request
            .publish_date_field_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(config.fields.publish_date.as_str());

        best_effort(
            "publish date",
            write_publish_date(client, task_id, field_id, publish_date.copied()),
        )
        .await;
    }

    Ok(())
}

// =============================================================================
// Create
// =============================================================================

/// Body of the `create` action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub layer: Option<String>,
    #[serde(default)]
    pub start: Option<DateInput>,
    #[serde(default)]
    pub end: Option<DateInput>,
    #[serde(default)]
    pub assignees: Vec<i64>,
    /// Content Type option index
    #[serde(default)]
    pub content_type: Option<u32>,
    /// Hemisphere option index
    #[serde(default)]
    pub hemisphere: Option<u32>,
}

impl CreateTaskRequest {
    /// The `POST /list/{id}/task` body.
    pub fn task_body(&self, config: &Config) -> Value {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::from(self.title.trim()));

        let start = self.start.and_then(DateInput::to_timestamp);
        let due = self.end.and_then(DateInput::to_timestamp).or(start);
        if let Some(start) = start {
            body.insert("start_date".to_string(), Value::from(start));
            body.insert("start_date_time".to_string(), Value::Bool(false));
        }
        if let Some(due) = due {
            body.insert("due_date".to_string(), Value::from(due));
            body.insert("due_date_time".to_string(), Value::Bool(false));
        }

        if !self.assignees.is_empty() {
            body.insert("assignees".to_string(), json!(self.assignees));
        }

        if let Some(index) = self.content_type {
            body.insert(
                "custom_fields".to_string(),
                json!([{ "id": config.fields.content_type, "value": index }]),
            );
        }

        Value::Object(body)
    }
}

/// Create a task in the list behind the requested layer. Unknown layers go to
/// the content list.
pub async fn create_task(
    client: &ClickUpClient,
    config: &Config,
    request: &CreateTaskRequest,
) -> Result<CreatedTask> {
    if request.title.trim().is_empty() {
        return Err(Error::Validation("title is required".to_string()));
    }

    let layer = Layer::from_name_or_content(request.layer.as_deref());
    let list_id = config.lists.for_layer(layer);

    let created = client.create_task(list_id, &request.task_body(config)).await?;
    info!(task_id = %created.id, %layer, "Created task");

    if let Some(hemisphere) = request.hemisphere {
        best_effort(
            "hemisphere",
            write_hemisphere(client, list_id, &created.id, hemisphere),
        )
        .await;
    }

    Ok(created)
}

// =============================================================================
// Members
// =============================================================================

/// Workspace members who can be assigned, taken from the content list.
pub async fn list_members(client: &ClickUpClient, config: &Config) -> Result<Vec<Value>> {
    client
        .list_members(&config.lists.content)
        .await
        .map_err(Error::into_read_failure)
}

fn require_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::Validation("id is required".to_string()));
    }
    Ok(id)
}
