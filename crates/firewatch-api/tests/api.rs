use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use firewatch_api::{AppStateInner, router};
use firewatch_db::{KeyValueStore, MemoryStorage, RecipientStore};
use firewatch_types::{AlertHistoryEntry, AlertRecipient, StoreSummary};

fn app() -> Router {
    let backend: Box<dyn KeyValueStore> = Box::new(MemoryStorage::new());
    let store = RecipientStore::open(backend).unwrap();
    router(AppStateInner::new(store))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

#[tokio::test]
async fn lists_seeded_collections() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/recipients", None).await;
    assert_eq!(status, StatusCode::OK);
    let recipients: Vec<AlertRecipient> = serde_json::from_value(body).unwrap();
    assert_eq!(recipients.len(), 4);

    let (status, body) = send(&app, Method::GET, "/history", None).await;
    assert_eq!(status, StatusCode::OK);
    let history: Vec<AlertHistoryEntry> = serde_json::from_value(body).unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.windows(2).all(|w| w[0].created_date >= w[1].created_date));
}

#[tokio::test]
async fn add_then_update_then_delete() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/recipients",
        Some(json!({
            "organization_name": "County Fire Department",
            "phone_number": "555",
            "alert_threshold": "extreme"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: AlertRecipient = serde_json::from_value(body).unwrap();
    assert!(created.is_active);

    let uri = format!("/recipients/{}", created.id);
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "organization_name": "County Fire Dept." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: AlertRecipient = serde_json::from_value(body).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_date, created.created_date);
    assert_eq!(updated.organization_name, "County Fire Dept.");

    let (_, body) = send(&app, Method::GET, "/history", None).await;
    let history: Vec<AlertHistoryEntry> = serde_json::from_value(body).unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].message, "Recipient updated: County Fire Dept.");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn validation_and_unknown_ids_map_to_client_errors() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/recipients",
        Some(json!({ "organization_name": "", "phone_number": "555" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "organization_name must not be empty");

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/recipients/{missing}"),
        Some(json!({ "organization_name": "Y" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/recipients", None).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_fields_are_rejected_before_the_store() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/recipients",
        Some(json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "organization_name": "X",
            "phone_number": "555"
        })),
    )
    .await;
    assert!(status.is_client_error());
    assert!(body["error"].as_str().unwrap().contains("unknown field `id`"));

    let (status, body) = send(&app, Method::GET, "/recipients/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, Method::GET, "/summary", None).await;
    let summary: StoreSummary = serde_json::from_value(body).unwrap();
    assert_eq!(summary.total_recipients, 4);
    assert_eq!(summary.history_total, 3);
}

#[tokio::test]
async fn toggling_active_changes_audience() {
    let app = app();

    let (_, body) = send(&app, Method::GET, "/audience/moderate", None).await;
    let audience: Vec<AlertRecipient> = serde_json::from_value(body).unwrap();
    assert_eq!(audience.len(), 1);
    let ontario = audience[0].id;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/recipients/{ontario}/active"),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/audience/moderate", None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = send(&app, Method::GET, "/summary", None).await;
    assert_eq!(body["active_recipients"], 3);
    assert_eq!(body["history_total"], 3);

    let (status, body) = send(&app, Method::GET, "/audience/critical", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("unknown severity 'critical'"));

    let (status, body) = send(&app, Method::GET, "/audience/EXTREME", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
