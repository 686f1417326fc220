mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestApp;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_database_status() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn approve_endpoint_requires_session_identity() {
    let app = TestApp::new().await;
    let request = app
        .seed_request(
            Some(json!({"p1": {"name": "Green Tea", "qty": 10}})),
            None,
            None,
            None,
        )
        .await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post(format!("/api/v1/requests/{}/approve", request.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn approve_endpoint_approves_with_gateway_headers() {
    let app = TestApp::new().await;
    let request = app
        .seed_request(
            Some(json!({"p1": {"name": "Green Tea", "qty": "10"}})),
            None,
            None,
            None,
        )
        .await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post(format!("/api/v1/requests/{}/approve", request.id))
                .header("x-user-id", "approver-1")
                .header("x-user-name", "Head of Operations")
                .header("x-user-role", "HeadOfOperations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    // String quantity normalized to a number.
    assert_eq!(body["data"]["total_quantity"], "10");
}

#[tokio::test]
async fn malformed_request_approval_returns_bad_request() {
    let app = TestApp::new().await;
    let request = app.seed_request(None, None, None, None).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post(format!("/api/v1/requests/{}/approve", request.id))
                .header("x-user-id", "approver-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "No items found in request");
}

#[tokio::test]
async fn showroom_create_and_lookup_roundtrip() {
    let app = TestApp::new().await;

    let create = Request::post("/api/v1/showrooms")
        .header("x-user-id", "admin-1")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "name": "Kandy Showroom",
                "code": "ds010",
                "location": "Peradeniya Road",
                "city": "Kandy"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["code"], "DS010");
    assert_eq!(body["data"]["status"], "active");

    // Retrievable through the uppercase code.
    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/v1/showrooms/by-code/DS010")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let duplicate = Request::post("/api/v1/showrooms")
        .header("x-user-id", "admin-1")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "name": "Kandy Annex",
                "code": "DS010",
                "location": "Hill Street",
                "city": "Kandy"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.router.clone().oneshot(duplicate).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn dispatch_endpoint_rejects_mismatched_allocation() {
    let app = TestApp::new().await;
    let request = app
        .seed_request(
            Some(json!({"p1": {"name": "Green Tea", "qty": 50}})),
            None,
            None,
            None,
        )
        .await;
    let approval = app
        .state
        .services
        .approvals
        .approve(request.id, &app.approver())
        .await
        .unwrap();
    let batch = app
        .seed_bulk_batch("Green Tea", "B-A", rust_decimal_macros::dec!(30))
        .await;

    let submission = Request::post("/api/v1/dispatches")
        .header("x-user-id", "fg-operator-1")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "history_id": approval.history_id,
                "items": {
                    "p1": {
                        "name": "Green Tea",
                        "dispatch_qty": 50,
                        "batches": [
                            {"batch_id": batch.id, "inventory_kind": "bulk", "quantity": 30}
                        ]
                    }
                }
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(submission).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Green Tea: Selected 30, need 50");
}
