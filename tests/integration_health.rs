mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use common::{response_json, setup_test_app};
use hallpass::access::store::MemoryRoleStore;

#[tokio::test]
async fn health_answers_without_identity() {
    let app = setup_test_app(Arc::new(MemoryRoleStore::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "hallpass");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["database"].is_string());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app(Arc::new(MemoryRoleStore::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = response_json(response).await;
    assert_eq!(doc["info"]["title"], "Hallpass API");
    assert!(doc["paths"].get("/api/roles/switch").is_some());
}
