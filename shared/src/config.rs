//! Configuration management for the calendar Lambda.

use std::env;

use crate::models::Layer;
use crate::{Error, Result};

const DEFAULT_API_URL: &str = "https://api.clickup.com/api/v2";

/// ClickUp list ids backing each calendar layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListIds {
    pub campaigns: String,
    pub content: String,
    pub alwayson: String,
    pub paid: String,
    pub holidays: String,
}

impl Default for ListIds {
    fn default() -> Self {
        Self {
            campaigns: "901106284410".to_string(),
            content: "901106284412".to_string(),
            alwayson: "901106284415".to_string(),
            paid: "901106284417".to_string(),
            holidays: "901106284421".to_string(),
        }
    }
}

impl ListIds {
    /// The list id for a layer.
    pub fn for_layer(&self, layer: Layer) -> &str {
        match layer {
            Layer::Campaigns => &self.campaigns,
            Layer::Content => &self.content,
            Layer::AlwaysOn => &self.alwayson,
            Layer::Paid => &self.paid,
            Layer::Holidays => &self.holidays,
        }
    }

    /// Every (layer, list id) pair in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (Layer, &str)> + '_ {
        Layer::ALL
            .into_iter()
            .map(move |layer| (layer, self.for_layer(layer)))
    }
}

/// Custom field ids written by create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIds {
    /// "Content Type" dropdown
    pub content_type: String,
    /// "Publish Date" date field
    pub publish_date: String,
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            content_type: "4b0f3a5e-2c71-4d8e-9a43-7e1c5b9d2f60".to_string(),
            publish_date: "c83d1e27-6f90-4a5b-b1c2-58d4e7f3a901".to_string(),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// ClickUp API token; requests fail with a configuration error without it
    pub api_token: Option<String>,
    /// ClickUp API base URL
    pub api_url: String,
    pub lists: ListIds,
    pub fields: FieldIds,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let lists = ListIds::default();
        let fields = FieldIds::default();

        Self {
            api_token: env::var("CLICKUP_API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            api_url: env::var("CLICKUP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            lists: ListIds {
                campaigns: env_or("CLICKUP_LIST_CAMPAIGNS", lists.campaigns),
                content: env_or("CLICKUP_LIST_CONTENT", lists.content),
                alwayson: env_or("CLICKUP_LIST_ALWAYSON", lists.alwayson),
                paid: env_or("CLICKUP_LIST_PAID", lists.paid),
                holidays: env_or("CLICKUP_LIST_HOLIDAYS", lists.holidays),
            },
            fields: FieldIds {
                content_type: env_or("CLICKUP_FIELD_CONTENT_TYPE", fields.content_type),
                publish_date: env_or("CLICKUP_FIELD_PUBLISH_DATE", fields.publish_date),
            },
        }
    }

    /// Configuration pointing at an arbitrary API base URL with default ids.
    pub fn with_api(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_token: Some(api_token.into()),
            api_url: api_url.into(),
            lists: ListIds::default(),
            fields: FieldIds::default(),
        }
    }

    /// The upstream credential, or a configuration error if unset.
    pub fn require_token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .ok_or_else(|| Error::Config("CLICKUP_API_TOKEN not set".to_string()))
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}
