//! Request-side value types: tri-state patch attributes and UI date input.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::fields::timestamp_from_date;

/// One attribute of a sparse update.
///
/// A key missing from the request body leaves the remote value untouched; an
/// explicit `null` clears it. Use with `#[serde(default)]` so missing keys
/// become `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Clear,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// `None` when absent, `Some(None)` when clearing.
    pub fn as_update(&self) -> Option<Option<&T>> {
        match self {
            Patch::Absent => None,
            Patch::Clear => Some(None),
            Patch::Set(value) => Some(Some(value)),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

/// A date as the calendar UI sends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// Epoch milliseconds, forwarded unchanged
    Millis(i64),
    /// Date-only value, encoded the way ClickUp stores dates
    Day(NaiveDate),
    /// Empty string; clears like `null`
    Blank,
}

impl DateInput {
    /// Millisecond timestamp to send to ClickUp, `None` for a blank.
    pub fn to_timestamp(self) -> Option<i64> {
        match self {
            DateInput::Millis(ms) => Some(ms),
            DateInput::Day(day) => Some(timestamp_from_date(day)),
            DateInput::Blank => None,
        }
    }

    /// JSON value for a ClickUp date property or field.
    pub fn to_json(self) -> Value {
        self.to_timestamp().map(Value::from).unwrap_or(Value::Null)
    }
}

impl<'de> Deserialize<'de> for DateInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(DateInput::Millis)
                .ok_or_else(|| D::Error::custom("invalid timestamp")),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(DateInput::Blank);
                }
                if let Ok(ms) = s.parse::<i64>() {
                    return Ok(DateInput::Millis(ms));
                }
                // Accept full ISO timestamps by taking the date part.
                let day = s.get(..10).unwrap_or(s);
                NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .map(DateInput::Day)
                    .map_err(|_| D::Error::custom(format!("invalid date: {}", s)))
            }
            other => Err(D::Error::custom(format!(
                "expected a date string or timestamp, got {}",
                other
            ))),
        }
    }
}

/// Patch of a date attribute into the JSON ClickUp expects; a blank date
/// clears just like `null`.
pub fn date_patch(patch: &Patch<DateInput>) -> Option<Value> {
    patch
        .as_update()
        .map(|update| update.map(|d| d.to_json()).unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        status: Patch<String>,
        #[serde(default)]
        start: Patch<DateInput>,
    }

    #[test]
    fn test_absent_null_and_set_are_distinct() {
        let absent: Body = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.status, Patch::Absent);

        let cleared: Body = serde_json::from_value(json!({"status": null})).unwrap();
        assert_eq!(cleared.status, Patch::Clear);

        let set: Body = serde_json::from_value(json!({"status": "done"})).unwrap();
        assert_eq!(set.status, Patch::Set("done".to_string()));
    }

    #[test]
    fn test_date_input_shapes() {
        let body: Body = serde_json::from_value(json!({"start": 1_740_873_600_000_i64})).unwrap();
        assert_eq!(body.start, Patch::Set(DateInput::Millis(1_740_873_600_000)));

        let body: Body = serde_json::from_value(json!({"start": "2025-03-01"})).unwrap();
        assert_eq!(date_patch(&body.start), Some(json!(1_740_873_600_000_i64)));

        let body: Body = serde_json::from_value(json!({"start": "2025-03-01T10:00:00Z"})).unwrap();
        assert_eq!(
            body.start,
            Patch::Set(DateInput::Day(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()))
        );

        let body: Body = serde_json::from_value(json!({"start": ""})).unwrap();
        assert_eq!(date_patch(&body.start), Some(Value::Null));

        let body: Body = serde_json::from_value(json!({"start": null})).unwrap();
        assert_eq!(date_patch(&body.start), Some(Value::Null));

        let body: Body = serde_json::from_value(json!({})).unwrap();
        assert_eq!(date_patch(&body.start), None);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(serde_json::from_value::<Body>(json!({"start": "next tuesday"})).is_err());
        assert!(serde_json::from_value::<Body>(json!({"start": true})).is_err());
    }
}
