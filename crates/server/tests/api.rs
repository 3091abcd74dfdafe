use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde::{Serialize, de::DeserializeOwned};
use tower::ServiceExt;

use engine::{Engine, EngineError, ExtractedItem, ReceiptExtractor, SettlementDate};
use server::{
    ServerState, router,
    types::{
        DraftView, ItemUpdate, ItemView, MonthView, Payer, PayerNames, ReceiptImported,
        ReceiptUpload, Session, SessionStep, SettlementView, StepUnit,
    },
};

struct FixedExtractor(Result<Vec<ExtractedItem>, String>);

#[async_trait]
impl ReceiptExtractor for FixedExtractor {
    async fn extract(&self, _image_base64: &str) -> Result<Vec<ExtractedItem>, EngineError> {
        self.0.clone().map_err(EngineError::Extraction)
    }
}

fn receipt() -> Vec<ExtractedItem> {
    vec![
        ExtractedItem {
            name: "Coffee".to_string(),
            amount: 150.0,
        },
        ExtractedItem {
            name: "Snack".to_string(),
            amount: 101.0,
        },
    ]
}

async fn app(extracted: Result<Vec<ExtractedItem>, String>) -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let engine = Engine::builder()
        .database(db)
        .active_date(SettlementDate::parse("2024-03-02").unwrap())
        .build()
        .await
        .unwrap();

    router(ServerState::new(
        engine,
        Arc::new(FixedExtractor(extracted)),
        PayerNames {
            payer_a: "Alice".to_string(),
            payer_b: "Bob".to_string(),
        },
    ))
}

async fn send<B: Serialize>(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&B>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(body).unwrap())
        }
        None => Body::empty(),
    };

    let res = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn get_json<T: DeserializeOwned>(app: &Router, uri: &str) -> T {
    let (status, body) = send::<()>(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

async fn upload(app: &Router) -> Vec<ItemView> {
    let (status, body) = send(
        app,
        Method::POST,
        "/draft/receipt",
        Some(&ReceiptUpload {
            image_base64: "aGVsbG8=".to_string(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice::<ReceiptImported>(&body).unwrap().items
}

#[tokio::test]
async fn receipt_items_land_in_the_active_draft() {
    let app = app(Ok(receipt())).await;

    let items = upload(&app).await;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.payer == Payer::PayerA));

    let draft: DraftView = get_json(&app, "/draft").await;
    assert_eq!(draft.date, "2024-03-02");
    assert_eq!(draft.items, items);
    assert_eq!(draft.totals.grand, 251);
    assert!(!draft.settled);
}

#[tokio::test]
async fn edit_then_settle() {
    let app = app(Ok(receipt())).await;
    let items = upload(&app).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/draft/items/{}", items[1].id),
        Some(&ItemUpdate {
            payer: Some(Payer::Split),
            ..Default::default()
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: ItemView = serde_json::from_slice(&body).unwrap();
    assert_eq!(updated.split, Some((51, 50)));

    let (status, body) = send::<()>(&app, Method::POST, "/draft/settle", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let record: SettlementView = serde_json::from_slice(&body).unwrap();
    assert_eq!(record.date, "2024-03-02");
    assert_eq!(record.item_count, 2);
    assert_eq!(record.totals.payer_a, 201);
    assert_eq!(record.totals.payer_b, 50);
    assert_eq!(record.totals.grand, 251);

    let draft: DraftView = get_json(&app, "/draft").await;
    assert!(draft.items.is_empty());
    assert!(draft.settled);

    let month: MonthView = get_json(&app, "/history").await;
    assert_eq!(month.month, "2024-03");
    assert_eq!(month.records, vec![record]);
    assert_eq!(month.totals.grand, 251);
}

#[tokio::test]
async fn settle_empty_draft_is_unprocessable() {
    let app = app(Ok(receipt())).await;
    let (status, _) = send::<()>(&app, Method::POST, "/draft/settle", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn negative_amount_is_rejected() {
    let app = app(Ok(receipt())).await;
    let items = upload(&app).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/draft/items/{}", items[0].id),
        Some(&ItemUpdate {
            amount_minor: Some(-5),
            ..Default::default()
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let draft: DraftView = get_json(&app, "/draft").await;
    assert_eq!(draft.items[0].amount_minor, 150);
}

#[tokio::test]
async fn extraction_failure_is_bad_gateway() {
    let app = app(Err("model offline".to_string())).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/draft/receipt",
        Some(&ReceiptUpload {
            image_base64: "aGVsbG8=".to_string(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let draft: DraftView = get_json(&app, "/draft").await;
    assert!(draft.items.is_empty());
}

#[tokio::test]
async fn empty_upload_is_bad_request() {
    let app = app(Ok(receipt())).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/draft/receipt",
        Some(&ReceiptUpload {
            image_base64: "  ".to_string(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_record_and_unknown_ids() {
    let app = app(Ok(receipt())).await;
    upload(&app).await;
    let (_, body) = send::<()>(&app, Method::POST, "/draft/settle", None).await;
    let record: SettlementView = serde_json::from_slice(&body).unwrap();

    let uri = format!("/history/{}", record.id);
    let (status, _) = send::<()>(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send::<()>(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let month: MonthView = get_json(&app, "/history?date=2024-03-15").await;
    assert!(month.records.is_empty());
    assert_eq!(month.totals.grand, 0);
}

#[tokio::test]
async fn remove_item_and_clear_draft() {
    let app = app(Ok(receipt())).await;
    let items = upload(&app).await;

    let uri = format!("/draft/items/{}", items[0].id);
    let (status, _) = send::<()>(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send::<()>(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send::<()>(&app, Method::DELETE, "/draft", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let draft: DraftView = get_json(&app, "/draft").await;
    assert!(draft.items.is_empty());
}

#[tokio::test]
async fn session_navigation() {
    let app = app(Ok(receipt())).await;

    let session: Session = get_json(&app, "/session").await;
    assert_eq!(session.date, "2024-03-02");

    let (status, body) = send(
        &app,
        Method::POST,
        "/session/step",
        Some(&SessionStep {
            unit: StepUnit::Day,
            delta: -2,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session: Session = serde_json::from_slice(&body).unwrap();
    assert_eq!(session.date, "2024-02-29");

    let (_, body) = send(
        &app,
        Method::POST,
        "/session/step",
        Some(&SessionStep {
            unit: StepUnit::Month,
            delta: -1,
        }),
    )
    .await;
    let session: Session = serde_json::from_slice(&body).unwrap();
    assert_eq!(session.date, "2024-01-29");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/session",
        Some(&Session {
            date: "2024-13-01".to_string(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/session",
        Some(&Session {
            date: "2024-05-10".to_string(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session: Session = serde_json::from_slice(&body).unwrap();
    assert_eq!(session.date, "2024-05-10");
}

#[tokio::test]
async fn payer_names_are_served() {
    let app = app(Ok(receipt())).await;
    let names: PayerNames = get_json(&app, "/payers").await;
    assert_eq!(names.payer_a, "Alice");
    assert_eq!(names.payer_b, "Bob");
}

#[tokio::test]
async fn unknown_payer_tag_is_rejected_with_json_error() {
    let app = app(Ok(receipt())).await;
    let items = upload(&app).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/draft/items/{}", items[0].id),
        Some(&serde_json::json!({ "payer": "both" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("unknown variant"));

    let draft: DraftView = get_json(&app, "/draft").await;
    assert_eq!(draft.items[0].payer, Payer::PayerA);
}

#[tokio::test]
async fn malformed_body_gets_json_error() {
    let app = app(Ok(receipt())).await;
    let req = Request::builder()
        .method(Method::PUT)
        .uri("/session")
        .header("content-type", "application/json")
        .body(Body::from("{\"date\":"))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(error["error"].is_string());
}
