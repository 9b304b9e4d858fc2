//! Custom-field normalization.
//!
//! Every function here is total: a missing field, a null value or a value of
//! an unexpected shape resolves to `None` or an empty vec, never an error.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

use crate::models::{value_as_i64, CustomField, FieldKind, FieldOption, OptionValue};
use crate::snapshot::OptionSnapshot;

pub const CONTENT_TYPE: &str = "Content Type";
pub const PUBLISH_LOCATION: &str = "Publish Location";
pub const PUBLISH_DATE: &str = "Publish Date";
pub const END_DATE: &str = "End date";

/// Field names that may hold the parent campaign, highest priority first.
pub const CAMPAIGN_FIELDS: [&str; 3] = ["Parent Campaign", "Campaign", "Related Campaign"];

const MS_PER_DAY: i64 = 86_400_000;

// =============================================================================
// Dates
// =============================================================================

/// Calendar date for a ClickUp millisecond timestamp.
///
/// Date-only values are stored as midnight UTC of the following day, so an
/// instant at exactly `00:00:00.000` is moved back one millisecond before the
/// date is taken. Timestamps carrying a real time of day are left alone.
pub fn date_from_timestamp(ms: i64) -> Option<NaiveDate> {
    let adjusted = if ms.rem_euclid(MS_PER_DAY) == 0 { ms - 1 } else { ms };
    DateTime::<Utc>::from_timestamp_millis(adjusted).map(|instant| instant.date_naive())
}

/// Timestamp ClickUp expects for a date-only value: next midnight UTC.
pub fn timestamp_from_date(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::default())
        .and_utc()
        .timestamp_millis()
        + MS_PER_DAY
}

// =============================================================================
// Field lookup
// =============================================================================

/// Find a field by name, ignoring case and surrounding whitespace.
pub fn find_field<'a>(fields: &'a [CustomField], name: &str) -> Option<&'a CustomField> {
    fields
        .iter()
        .find(|f| f.name.trim().eq_ignore_ascii_case(name))
}

/// Content Type only counts when it is a dropdown.
pub fn resolve_content_type(fields: &[CustomField]) -> Option<OptionValue> {
    find_field(fields, CONTENT_TYPE)
        .filter(|f| f.kind() == FieldKind::DropDown)
        .and_then(|f| resolve_option(Some(f)))
}

// =============================================================================
// Options
// =============================================================================

/// Resolve a single-select value to its option name and color.
///
/// Numeric values are option order indexes, string values are option ids.
/// Unmatched indexes fall back to the snapshot table of the same field.
/// Unmatched ids fall back to the snapshot table and then to the raw id.
pub fn resolve_option(field: Option<&CustomField>) -> Option<OptionValue> {
    let field = field?;
    resolve_option_value(&field.value, field)
}

fn resolve_option_value(value: &Value, field: &CustomField) -> Option<OptionValue> {
    let options = field.options();
    let snapshot = OptionSnapshot::get();

    match value {
        Value::Number(_) => {
            let index = value_as_i64(value)?;
            options
                .iter()
                .find(|o| o.orderindex == Some(index))
                .map(option_value)
                .or_else(|| snapshot.name_for_index(&field.name, index).map(uncolored))
        }
        Value::String(id) => options
            .iter()
            .find(|o| o.id == *id)
            .map(option_value)
            .or_else(|| snapshot.name_for_id(id).map(uncolored))
            .or_else(|| Some(uncolored(id))),
        _ => None,
    }
}

/// Resolve a multi-select value, keeping input order and dropping entries
/// that end up without a name.
pub fn resolve_multi_option(field: Option<&CustomField>) -> Vec<OptionValue> {
    let Some(field) = field else {
        return Vec::new();
    };

    let elements: &[Value] = match &field.value {
        Value::Array(items) => items,
        Value::Null => &[],
        single => std::slice::from_ref(single),
    };

    elements
        .iter()
        .filter_map(|element| resolve_element(element, field))
        .filter(|option| !option.name.is_empty())
        .collect()
}

fn resolve_element(element: &Value, field: &CustomField) -> Option<OptionValue> {
    let Value::Object(embedded) = element else {
        return resolve_option_value(element, field);
    };
    let options = field.options();

    let id = embedded.get("id").and_then(Value::as_str);
    let live = id.and_then(|id| options.iter().find(|o| o.id == id));
    if let Some(option) = live {
        return Some(option_value(option));
    }

    let embedded_name = embedded
        .get("name")
        .or_else(|| embedded.get("label"))
        .and_then(Value::as_str);
    if let Some(name) = embedded_name {
        return Some(OptionValue {
            name: name.to_string(),
            color: clean_color(embedded.get("color").and_then(Value::as_str)),
        });
    }

    id.and_then(|id| OptionSnapshot::get().name_for_id(id).or(Some(id)))
        .map(uncolored)
}

fn option_value(option: &FieldOption) -> OptionValue {
    OptionValue {
        name: option.name.clone().unwrap_or_default(),
        color: clean_color(option.color.as_deref()),
    }
}

fn uncolored(name: &str) -> OptionValue {
    OptionValue {
        name: name.to_string(),
        color: None,
    }
}

/// ClickUp uses `"none"` for "no color".
fn clean_color(color: Option<&str>) -> Option<String> {
    color
        .filter(|c| !c.is_empty() && *c != "none")
        .map(str::to_string)
}

// =============================================================================
// Dates and relationships
// =============================================================================

/// Date held by a named date field.
pub fn resolve_date_field(fields: &[CustomField], field_name: &str) -> Option<NaiveDate> {
    find_field(fields, field_name)
        .and_then(|f| value_as_i64(&f.value))
        .and_then(date_from_timestamp)
}

/// Display string for the first candidate field present on the task.
pub fn resolve_relationship_field(fields: &[CustomField], candidates: &[&str]) -> Option<String> {
    let field = candidates
        .iter()
        .find_map(|name| find_field(fields, name))?;

    let resolved = match field.kind() {
        FieldKind::DropDown => resolve_option(Some(field)).map(|o| o.name),
        FieldKind::ListRelationship => {
            let names: Vec<&str> = field
                .value
                .as_array()
                .map(|items| items.iter().filter_map(linked_item_name).collect())
                .unwrap_or_default();
            Some(names.join(", "))
        }
        _ => field.value.as_str().map(str::to_string),
    };

    resolved.filter(|s| !s.is_empty())
}

fn linked_item_name(item: &Value) -> Option<&str> {
    item.get("name")
        .or_else(|| item.get("title"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}
