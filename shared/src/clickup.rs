//! ClickUp v2 REST client.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::models::{
    ClickUpErrorBody, CreatedTask, CustomField, FieldsResponse, ListDetail, MembersResponse,
    RemoteTask, TasksPage,
};
use crate::{Config, Error, Result};

/// Authenticated client for one ClickUp workspace.
#[derive(Clone)]
pub struct ClickUpClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ClickUpClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Build a client from configuration; fails if the token is missing.
    pub fn from_config(http: reqwest::Client, config: &Config) -> Result<Self> {
        let token = config.require_token()?;
        Ok(Self::new(http, config.api_url.clone(), token))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.base_url, path))
            .header("Authorization", &self.token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        check(request.send().await?).await?;
        Ok(())
    }

    /// Tasks of one list, closed tasks and subtasks included.
    pub async fn list_tasks(&self, list_id: &str) -> Result<Vec<RemoteTask>> {
        let request = self
            .request(Method::GET, &format!("list/{}/task", encode(list_id)))
            .query(&[("include_closed", "true"), ("subtasks", "true")]);
        let page: TasksPage = self.send(request).await?;
        debug!(list_id, tasks = page.tasks.len(), "Fetched list tasks");
        Ok(page.tasks)
    }

    /// One task as ClickUp returns it, every property kept.
    pub async fn get_task(&self, task_id: &str) -> Result<Map<String, Value>> {
        self.send(self.request(Method::GET, &format!("task/{}", encode(task_id))))
            .await
    }

    pub async fn get_list(&self, list_id: &str) -> Result<ListDetail> {
        self.send(self.request(Method::GET, &format!("list/{}", encode(list_id))))
            .await
    }

    /// Custom field definitions available on a list.
    pub async fn list_fields(&self, list_id: &str) -> Result<Vec<CustomField>> {
        let response: FieldsResponse = self
            .send(self.request(Method::GET, &format!("list/{}/field", encode(list_id))))
            .await?;
        Ok(response.fields)
    }

    /// Members with access to a list, as ClickUp returns them.
    pub async fn list_members(&self, list_id: &str) -> Result<Vec<Value>> {
        let response: MembersResponse = self
            .send(self.request(Method::GET, &format!("list/{}/member", encode(list_id))))
            .await?;
        Ok(response.members)
    }

    pub async fn create_task<B: Serialize>(&self, list_id: &str, body: &B) -> Result<CreatedTask> {
        let request = self
            .request(Method::POST, &format!("list/{}/task", encode(list_id)))
            .json(body);
        self.send(request).await
    }

    pub async fn update_task<B: Serialize>(&self, task_id: &str, body: &B) -> Result<()> {
        let request = self
            .request(Method::PUT, &format!("task/{}", encode(task_id)))
            .json(body);
        self.send_empty(request).await
    }

    pub async fn set_field(&self, task_id: &str, field_id: &str, value: Value) -> Result<()> {
        let request = self
            .request(
                Method::POST,
                &format!("task/{}/field/{}", encode(task_id), encode(field_id)),
            )
            .json(&json!({ "value": value }));
        self.send_empty(request).await
    }

    pub async fn clear_field(&self, task_id: &str, field_id: &str) -> Result<()> {
        let request = self.request(
            Method::DELETE,
            &format!("task/{}/field/{}", encode(task_id), encode(field_id)),
        );
        self.send_empty(request).await
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Turn a non-success response into `Error::Upstream`, keeping ClickUp's
/// status and message.
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ClickUpErrorBody>(&body)
        .ok()
        .and_then(|e| e.err)
        .or_else(|| Some(body).filter(|b| !b.trim().is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    Err(Error::Upstream {
        status: status.as_u16(),
        message,
    })
}
