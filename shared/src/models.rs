//! ClickUp wire types and the normalized calendar shapes built from them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Calendar layers
// =============================================================================

/// Calendar layer, one per source list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Campaigns,
    Content,
    AlwaysOn,
    Paid,
    Holidays,
}

impl Layer {
    /// All layers in calendar order.
    pub const ALL: [Layer; 5] = [
        Layer::Campaigns,
        Layer::Content,
        Layer::AlwaysOn,
        Layer::Paid,
        Layer::Holidays,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Campaigns => "campaigns",
            Layer::Content => "content",
            Layer::AlwaysOn => "alwayson",
            Layer::Paid => "paid",
            Layer::Holidays => "holidays",
        }
    }

    /// Resolve a layer name from the UI; anything unrecognized lands in content.
    pub fn from_name_or_content(name: Option<&str>) -> Layer {
        name.and_then(|n| n.parse().ok()).unwrap_or(Layer::Content)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown layer: {}", s))
    }
}

// =============================================================================
// ClickUp wire types
// =============================================================================

/// ClickUp API error body.
#[derive(Debug, Deserialize)]
pub struct ClickUpErrorBody {
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default, rename = "ECODE")]
    pub ecode: Option<String>,
}

/// Task status as ClickUp reports it on tasks and lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub orderindex: Option<i64>,
}

/// ClickUp user as embedded in task assignees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    #[serde(
        default,
        rename = "profilePicture",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture: Option<String>,
}

/// Dropdown / label option from a field's `type_config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "label")]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub orderindex: Option<i64>,
}

/// Field type configuration; only the option list matters here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeConfig {
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

/// Known custom-field kinds. ClickUp adds new ones often, so the raw type
/// string is kept on the field and parsed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    DropDown,
    Labels,
    ShortText,
    Text,
    ListRelationship,
    Date,
    Other,
}

impl FieldKind {
    pub fn from_type(field_type: &str) -> Self {
        match field_type {
            "drop_down" => FieldKind::DropDown,
            "labels" => FieldKind::Labels,
            "short_text" => FieldKind::ShortText,
            "text" => FieldKind::Text,
            "list_relationship" => FieldKind::ListRelationship,
            "date" => FieldKind::Date,
            _ => FieldKind::Other,
        }
    }
}

/// Task-attached custom field. `value` is shape-shifting by type, so it stays
/// a raw JSON value until the resolver interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_config: Option<TypeConfig>,
}

impl CustomField {
    pub fn kind(&self) -> FieldKind {
        FieldKind::from_type(&self.field_type)
    }

    /// Live options, empty when the field carries no `type_config`.
    pub fn options(&self) -> &[FieldOption] {
        self.type_config
            .as_ref()
            .map(|c| c.options.as_slice())
            .unwrap_or_default()
    }

    /// True when the value is null, an empty string, or an empty array.
    pub fn is_empty(&self) -> bool {
        is_empty_value(&self.value)
    }
}

/// Null, an empty string, or an empty array.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// ClickUp task.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteTask {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub start_date: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub due_date: Option<i64>,
    #[serde(default)]
    pub assignees: Vec<Member>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// `GET /list/{id}/task`
#[derive(Debug, Deserialize)]
pub struct TasksPage {
    #[serde(default)]
    pub tasks: Vec<RemoteTask>,
}

/// `GET /list/{id}`; only the status set is used.
#[derive(Debug, Deserialize)]
pub struct ListDetail {
    #[serde(default)]
    pub statuses: Vec<TaskStatus>,
}

/// `GET /list/{id}/field`
#[derive(Debug, Deserialize)]
pub struct FieldsResponse {
    #[serde(default)]
    pub fields: Vec<CustomField>,
}

/// `GET /list/{id}/member`; members pass through untouched.
#[derive(Debug, Deserialize)]
pub struct MembersResponse {
    #[serde(default)]
    pub members: Vec<Value>,
}

// =============================================================================
// Normalized shapes served to the calendar UI
// =============================================================================

/// A resolved dropdown/label option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionValue {
    pub name: String,
    pub color: Option<String>,
}

/// Assignee reduced to what the calendar shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignee {
    pub id: i64,
    pub name: String,
}

impl From<&Member> for Assignee {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member
                .username
                .clone()
                .or_else(|| member.email.clone())
                .unwrap_or_default(),
        }
    }
}

/// One calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub id: String,
    pub title: String,
    pub layer: Layer,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub publish_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub url: Option<String>,
    pub assignees: Vec<Assignee>,
    #[serde(rename = "type")]
    pub content_type: Option<OptionValue>,
    pub locations: Vec<OptionValue>,
    pub campaign: Option<String>,
}

/// Response to `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTask {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Response to `task`: the task exactly as ClickUp returned it, minus empty
/// custom fields, with normalized dates and the list's statuses added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Map<String, Value>,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<TaskStatus>>,
}

// =============================================================================
// Lenient number parsing
// =============================================================================

/// Read an integer that ClickUp may send as a number or a numeric string.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64))
}
