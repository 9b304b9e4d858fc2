//! Task aggregation across the calendar's lists.

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::clickup::ClickUpClient;
use crate::config::ListIds;
use crate::fields::{
    date_from_timestamp, resolve_content_type, resolve_date_field, resolve_multi_option,
    resolve_relationship_field, find_field, CAMPAIGN_FIELDS, END_DATE, PUBLISH_DATE,
    PUBLISH_LOCATION,
};
use crate::models::{Assignee, Layer, NormalizedEvent, RemoteTask};
use crate::{Error, Result};

/// Fetch every configured list concurrently and flatten the tasks into
/// calendar events.
///
/// Events come out in list order, then in the order ClickUp returned them,
/// whichever request finishes first. Any failed list fails the whole call.
pub async fn list_events(client: &ClickUpClient, lists: &ListIds) -> Result<Vec<NormalizedEvent>> {
    let fetches = lists.iter().map(|(layer, list_id)| async move {
        let tasks = client.list_tasks(list_id).await?;
        debug!(layer = %layer, list_id, tasks = tasks.len(), "Fetched list");
        Ok::<_, Error>(
            tasks
                .iter()
                .map(|task| normalize_task(task, layer))
                .collect::<Vec<_>>(),
        )
    });

    let events: Vec<NormalizedEvent> = try_join_all(fetches)
        .await
        .map_err(Error::into_read_failure)?
        .into_iter()
        .flatten()
        .collect();
    info!(events = events.len(), "Aggregated calendar events");
    Ok(events)
}

/// Flatten one ClickUp task into a calendar event.
pub fn normalize_task(task: &RemoteTask, layer: Layer) -> NormalizedEvent {
    let fields = task.custom_fields.as_slice();

    let publish_date = resolve_date_field(fields, PUBLISH_DATE);
    let start_date = task.start_date.and_then(date_from_timestamp);
    let due_date = task.due_date.and_then(date_from_timestamp);

    let start = start_date.or(publish_date).or(due_date);
    let end = resolve_date_field(fields, END_DATE)
        .or(publish_date)
        .or(due_date)
        .or(start);

    NormalizedEvent {
        id: task.id.clone(),
        title: task.name.clone(),
        layer,
        start,
        end,
        publish_date,
        status: task.status.as_ref().map(|s| s.status.clone()),
        url: task.url.clone(),
        assignees: task.assignees.iter().map(Assignee::from).collect(),
        content_type: resolve_content_type(fields),
        locations: resolve_multi_option(find_field(fields, PUBLISH_LOCATION)),
        campaign: resolve_relationship_field(fields, &CAMPAIGN_FIELDS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn task(value: Value) -> RemoteTask {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_full_task() {
        let task = task(json!({
            "id": "t1",
            "name": "Spring newsletter",
            "status": {"status": "scheduled", "color": "#00ff00"},
            "url": "https://app.clickup.com/t/t1",
            "start_date": "1740873600000",
            "due_date": null,
            "assignees": [{"id": 7, "username": "sam"}],
            "custom_fields": [
                {"id": "ct", "name": "Content Type", "type": "drop_down", "value": 2,
                 "type_config": {"options": []}},
                {"id": "pl", "name": "Publish Location", "type": "labels", "value": ["loc-1"],
                 "type_config": {"options": [{"id": "loc-1", "label": "Email", "color": "#123456"}]}},
                {"id": "pd", "name": "Publish Date", "type": "date", "value": "1741046400000"},
                {"id": "ed", "name": "End date", "type": "date", "value": "1741219200000"},
                {"id": "pc", "name": "Campaign", "type": "short_text", "value": "Spring"}
            ]
        }));

        let event = normalize_task(&task, Layer::Content);
        assert_eq!(event.layer, Layer::Content);
        assert_eq!(event.title, "Spring newsletter");
        assert_eq!(event.start, date(2025, 3, 1));
        assert_eq!(event.publish_date, date(2025, 3, 3));
        assert_eq!(event.end, date(2025, 3, 5));
        assert_eq!(event.status.as_deref(), Some("scheduled"));
        assert_eq!(event.assignees, vec![Assignee { id: 7, name: "sam".to_string() }]);
        assert_eq!(event.content_type.unwrap().name, "Newsletter");
        assert_eq!(event.locations[0].name, "Email");
        assert_eq!(event.campaign.as_deref(), Some("Spring"));
    }

    #[test]
    fn test_date_fallback_chain() {
        let due_only = task(json!({"id": "a", "name": "A", "due_date": "1741046400000"}));
        let event = normalize_task(&due_only, Layer::Paid);
        assert_eq!(event.start, date(2025, 3, 3));
        assert_eq!(event.end, date(2025, 3, 3));

        let publish_only = task(json!({"id": "b", "name": "B", "custom_fields": [
            {"id": "pd", "name": "Publish Date", "type": "date", "value": 1741046400000_i64}
        ]}));
        let event = normalize_task(&publish_only, Layer::Content);
        assert_eq!(event.start, date(2025, 3, 3));
        assert_eq!(event.end, date(2025, 3, 3));

        let start_only = task(json!({"id": "c", "name": "C", "start_date": 1740873600000_i64}));
        let event = normalize_task(&start_only, Layer::Holidays);
        assert_eq!(event.start, date(2025, 3, 1));
        assert_eq!(event.end, date(2025, 3, 1));

        let undated = task(json!({"id": "d", "name": "D"}));
        let event = normalize_task(&undated, Layer::AlwaysOn);
        assert_eq!(event.start, None);
        assert_eq!(event.end, None);
    }

    #[test]
    fn test_content_type_must_be_dropdown() {
        let task = task(json!({"id": "e", "name": "E", "custom_fields": [
            {"id": "ct", "name": "Content Type", "type": "short_text", "value": "Blog"}
        ]}));
        assert_eq!(normalize_task(&task, Layer::Content).content_type, None);
    }

    async fn mount_list(server: &MockServer, list_id: &str, body: Value, delay_ms: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/list/{}/task", list_id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_events_keep_list_order_regardless_of_timing() {
        let server = MockServer::start().await;
        let lists = ListIds::default();

        mount_list(&server, &lists.campaigns, json!({"tasks": [{"id": "t1", "name": "Campaign"}]}), 300).await;
        mount_list(&server, &lists.content, json!({"tasks": [{"id": "t2", "name": "Post"}]}), 0).await;
        for list_id in [&lists.alwayson, &lists.paid, &lists.holidays] {
            mount_list(&server, list_id, json!({"tasks": []}), 0).await;
        }

        let client = ClickUpClient::new(reqwest::Client::new(), server.uri(), "pk_test");
        let events = list_events(&client, &lists).await.unwrap();

        let summary: Vec<(&str, Layer)> = events.iter().map(|e| (e.id.as_str(), e.layer)).collect();
        assert_eq!(summary, vec![("t1", Layer::Campaigns), ("t2", Layer::Content)]);
    }

    #[tokio::test]
    async fn test_one_failed_list_fails_aggregation() {
        let server = MockServer::start().await;
        let lists = ListIds::default();

        for list_id in [&lists.campaigns, &lists.content, &lists.alwayson, &lists.holidays] {
            mount_list(&server, list_id, json!({"tasks": [{"id": "x", "name": "X"}]}), 0).await;
        }
        Mock::given(method("GET"))
            .and(path(format!("/list/{}/task", lists.paid)))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"err": "boom"})))
            .mount(&server)
            .await;

        let client = ClickUpClient::new(reqwest::Client::new(), server.uri(), "pk_test");
        let err = list_events(&client, &lists).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_rejected_list_fetch_is_server_error() {
        let server = MockServer::start().await;
        let lists = ListIds::default();

        for list_id in [&lists.campaigns, &lists.alwayson, &lists.paid, &lists.holidays] {
            mount_list(&server, list_id, json!({"tasks": []}), 0).await;
        }
        Mock::given(method("GET"))
            .and(path(format!("/list/{}/task", lists.content)))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"err": "Token invalid"})))
            .mount(&server)
            .await;

        let client = ClickUpClient::new(reqwest::Client::new(), server.uri(), "pk_test");
        let err = list_events(&client, &lists).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamRead { status: 401, .. }));
        assert_eq!(err.status_code(), 500);
    }
}
