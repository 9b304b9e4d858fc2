//! Shared library for the marketing calendar Lambda.
//!
//! This crate holds the ClickUp client, the custom-field normalization and
//! the task operations the `calendar` function dispatches to.

pub mod aggregator;
pub mod clickup;
pub mod config;
pub mod error;
pub mod fields;
pub mod http;
pub mod models;
pub mod patch;
pub mod secondary;
pub mod snapshot;
pub mod tasks;

pub use aggregator::{list_events, normalize_task};
pub use clickup::ClickUpClient;
pub use config::Config;
pub use error::{Error, Result};
pub use models::{CreatedTask, Layer, NormalizedEvent, OptionValue, TaskDetail};
pub use patch::{DateInput, Patch};
pub use tasks::{
    create_task, get_task_detail, list_members, update_task, CreateTaskRequest, UpdateTaskRequest,
};
