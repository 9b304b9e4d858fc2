//! Calendar Lambda - Serves the marketing calendar from ClickUp.
//!
//! Actions, selected by the `action` query parameter:
//! - GET ?action=tasks - All calendar events across the configured lists
//! - GET ?action=members - Assignable workspace members
//! - GET ?action=task&id={id} - One task with its editable fields
//! - POST ?action=create - Create a task in a layer's list
//! - POST ?action=update - Sparse update of an existing task

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use serde::Serialize;
use shared::http::{error_to_response, json_response, preflight_response, OkBody};
use shared::{
    create_task, get_task_detail, list_events, list_members, parse_body, update_task,
    ClickUpClient, Config, CreateTaskRequest, UpdateTaskRequest,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application state
struct AppState {
    config: Config,
    http_client: reqwest::Client,
}

impl AppState {
    fn new() -> Self {
        let config = Config::from_env();
        if config.api_token.is_none() {
            warn!("CLICKUP_API_TOKEN not set; requests will fail until it is configured");
        }

        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Tasks,
    Task,
    Members,
    Create,
    Update,
}

impl Action {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "tasks" => Some(Action::Tasks),
            "task" => Some(Action::Task),
            "members" => Some(Action::Members),
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            _ => None,
        }
    }

    fn method(self) -> Method {
        match self {
            Action::Tasks | Action::Task | Action::Members => Method::GET,
            Action::Create | Action::Update => Method::POST,
        }
    }
}

/// Serialize a successful result, or turn the error into its response.
fn respond<T: Serialize>(result: shared::Result<T>) -> Result<Response<Body>, Error> {
    match result {
        Ok(data) => json_response(200, &data),
        Err(e) => respond_error(e),
    }
}

fn respond_error(e: shared::Error) -> Result<Response<Body>, Error> {
    if e.status_code() >= 500 {
        error!(error = %e, "Request failed");
    } else {
        warn!(error = %e, "Request rejected");
    }
    error_to_response(&e)
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    let client = match ClickUpClient::from_config(state.http_client.clone(), &state.config) {
        Ok(client) => client,
        Err(e) => return respond_error(e),
    };

    let params = event.query_string_parameters();
    let action_name = params.first("action").unwrap_or_default();
    let Some(action) = Action::parse(action_name) else {
        return respond_error(shared::Error::Validation(format!(
            "Unknown action: {}",
            action_name
        )));
    };

    if event.method() != action.method() {
        return respond_error(shared::Error::MethodNotAllowed(format!(
            "{} does not accept {}",
            action_name,
            event.method()
        )));
    }

    info!(action = action_name, "Handling calendar request");

    match action {
        Action::Tasks => respond(list_events(&client, &state.config.lists).await),
        Action::Members => respond(list_members(&client, &state.config).await),
        Action::Task => match params.first("id").filter(|id| !id.trim().is_empty()) {
            Some(id) => respond(get_task_detail(&client, id).await),
            None => respond_error(shared::Error::Validation("id is required".to_string())),
        },
        Action::Create => {
            let request: CreateTaskRequest = parse_body!(event.body());
            respond(create_task(&client, &state.config, &request).await)
        }
        Action::Update => {
            let request: UpdateTaskRequest = parse_body!(event.body());
            respond(
                update_task(&client, &state.config, &request)
                    .await
                    .map(|()| OkBody::new()),
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new());

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
