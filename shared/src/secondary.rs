//! Best-effort secondary operations.
//!
//! These run after a primary read or write has succeeded. A failure never
//! reaches the caller: it is logged and dropped inside [`best_effort`], and
//! the write functions below are only ever awaited through it.

use std::future::Future;

use serde_json::Value;
use tracing::{debug, warn};

use crate::clickup::ClickUpClient;
use crate::patch::DateInput;
use crate::{Error, Result};

/// Await a secondary operation, logging and discarding any failure.
pub async fn best_effort<T, F>(operation: &str, secondary: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match secondary.await {
        Ok(value) => {
            debug!(operation, "Secondary operation succeeded");
            Some(value)
        }
        Err(e) => {
            warn!(operation, error = %e, "Secondary operation failed, ignoring");
            None
        }
    }
}

/// Set or clear the Publish Date field of a task.
pub async fn write_publish_date(
    client: &ClickUpClient,
    task_id: &str,
    field_id: &str,
    publish_date: Option<DateInput>,
) -> Result<()> {
    match publish_date.and_then(DateInput::to_timestamp) {
        Some(ms) => client.set_field(task_id, field_id, Value::from(ms)).await,
        None => client.clear_field(task_id, field_id).await,
    }
}

/// Set the list's hemisphere dropdown on a new task by option index.
pub async fn write_hemisphere(
    client: &ClickUpClient,
    list_id: &str,
    task_id: &str,
    hemisphere: u32,
) -> Result<()> {
    let fields = client.list_fields(list_id).await?;
    let field = fields
        .iter()
        .find(|f| f.name.to_lowercase().contains("hemisphere"))
        .ok_or_else(|| Error::Internal(format!("no hemisphere field on list {}", list_id)))?;

    client
        .set_field(task_id, &field.id, Value::from(hemisphere))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ClickUpClient {
        ClickUpClient::new(reqwest::Client::new(), server.uri(), "pk_test")
    }

    #[tokio::test]
    async fn test_best_effort_swallows_errors() {
        let outcome: Option<()> = best_effort("always fails", async {
            Err(Error::Internal("boom".to_string()))
        })
        .await;
        assert_eq!(outcome, None);

        let value = best_effort("succeeds", async { Ok(7) }).await;
        assert_eq!(value, Some(7));
    }

    #[tokio::test]
    async fn test_hemisphere_picks_first_matching_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list/L1/field"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fields": [
                {"id": "f-type", "name": "Content Type", "type": "drop_down"},
                {"id": "f-hemi", "name": "Target Hemisphere", "type": "drop_down"},
                {"id": "f-hemi-2", "name": "HEMISPHERE (old)", "type": "drop_down"}
            ]})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/task/t1/field/f-hemi"))
            .and(body_json(json!({"value": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        write_hemisphere(&client(&server), "L1", "t1", 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_hemisphere_missing_field_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list/L1/field"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fields": []})))
            .mount(&server)
            .await;

        assert!(write_hemisphere(&client(&server), "L1", "t1", 0).await.is_err());
    }

    #[tokio::test]
    async fn test_publish_date_blank_clears_field() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/task/t1/field/pd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        write_publish_date(&client(&server), "t1", "pd", Some(DateInput::Blank))
            .await
            .unwrap();
    }
}
