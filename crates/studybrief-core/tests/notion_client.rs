//! NotionClient against a local stub of the database query endpoint

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use studybrief_core::config::NotionConfig;
use studybrief_core::{CoreError, NotionClient, TableSource};

#[derive(Debug, Clone)]
struct Captured {
    table_id: String,
    authorization: String,
    notion_version: String,
    body: Value,
}

type Log = Arc<Mutex<Vec<Captured>>>;

async fn query(
    State(log): State<Log>,
    Path(table_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    log.lock().unwrap().push(Captured {
        table_id: table_id.clone(),
        authorization: header("authorization"),
        notion_version: header("notion-version"),
        body,
    });

    match table_id.as_str() {
        "limited" => (StatusCode::TOO_MANY_REQUESTS, r#"{"code":"rate_limited"}"#).into_response(),
        "garbled" => (StatusCode::OK, "not json").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"results": []})).into_response()
        }
        _ => Json(json!({
            "object": "list",
            "results": [{
                "id": "page-1",
                "created_time": "2026-03-01T10:00:00.000Z",
                "properties": {
                    "Name": {"type": "title", "title": [{"plain_text": "Intune "}, {"plain_text": "docs"}]},
                    "Formula": {"type": "formula", "formula": {"number": 3}}
                }
            }],
            "has_more": false
        }))
        .into_response(),
    }
}

async fn stub() -> (NotionClient, Log) {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/v1/databases/{table_id}/query", post(query))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = NotionClient::new(&NotionConfig {
        token: "secret_abc".to_string(),
        base_url: format!("http://{}/v1/", addr),
        timeout: Duration::from_millis(500),
    })
    .unwrap();
    (client, log)
}

#[tokio::test]
async fn test_query_sends_auth_and_version_headers() {
    let (client, log) = stub().await;

    let pages = client
        .query_by_date("plan-db", "Date", "2026-03-02")
        .await
        .unwrap();
    assert_eq!(pages.len(), 1);

    let captured = log.lock().unwrap()[0].clone();
    assert_eq!(captured.table_id, "plan-db");
    assert_eq!(captured.authorization, "Bearer secret_abc");
    assert_eq!(captured.notion_version, "2022-06-28");
    assert_eq!(
        captured.body,
        json!({"filter": {"property": "Date", "date": {"equals": "2026-03-02"}}})
    );
}

#[tokio::test]
async fn test_results_are_decoded_leniently() {
    let (client, _log) = stub().await;

    let pages = client
        .query_by_text("resources-db", "Resource ID", "RES-1")
        .await
        .unwrap();
    let page = &pages[0];
    assert_eq!(page.id, "page-1");
    assert_eq!(page.created_time.as_deref(), Some("2026-03-01T10:00:00.000Z"));
    assert_eq!(page.text("Name"), "Intune docs");
    assert_eq!(page.text("Formula"), "");
}

#[tokio::test]
async fn test_unresolved_query_body() {
    let (client, log) = stub().await;

    client.query_unresolved("mistakes-db", "Resolved").await.unwrap();

    let body = log.lock().unwrap()[0].body.clone();
    assert_eq!(body["filter"]["property"], "Resolved");
    assert_eq!(body["filter"]["checkbox"]["equals"], false);
    assert_eq!(body["sorts"][0]["direction"], "descending");
}

#[tokio::test]
async fn test_non_success_status_keeps_status_and_body() {
    let (client, _log) = stub().await;

    let err = client
        .query_by_date("limited", "Date", "2026-03-02")
        .await
        .unwrap_err();
    match &err {
        CoreError::Upstream { status, body } => {
            assert_eq!(*status, 429);
            assert_eq!(body, r#"{"code":"rate_limited"}"#);
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        r#"Notion API error: 429 - {"code":"rate_limited"}"#
    );
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let (client, _log) = stub().await;

    let err = client
        .query_by_date("garbled", "Date", "2026-03-02")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let (client, _log) = stub().await;

    let err = client
        .query_by_date("slow", "Date", "2026-03-02")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Transport { .. }));
    assert_eq!(err.upstream_status(), None);
}
