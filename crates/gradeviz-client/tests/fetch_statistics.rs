//! Integration tests for the statistics client.
//!
//! Each test spins a real axum server on an ephemeral port and drives the
//! client against it, so the URL construction, status handling, and body
//! decoding are exercised over actual HTTP.
//!
//! Run with: `cargo test --package gradeviz-client --test fetch_statistics`

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use gradeviz_client::{ClientError, StatisticsClient};
use gradeviz_core::FetchFailure;

/// Serve a router on an ephemeral port and return its address.
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Router that records each received `student_id` and answers with `body`.
fn recording_router(body: Value, seen: Arc<Mutex<Vec<String>>>) -> Router {
    Router::new().route(
        "/grade_statistics/",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = seen.clone();
            let body = body.clone();
            async move {
                seen.lock()
                    .unwrap()
                    .push(params.get("student_id").cloned().unwrap_or_default());
                Json(body)
            }
        }),
    )
}

fn client_for(addr: SocketAddr) -> StatisticsClient {
    StatisticsClient::new(format!("http://{}/grade_statistics/", addr))
}

#[tokio::test]
async fn sends_student_id_query_parameter_exactly_once() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let addr = serve(recording_router(json!([1.0]), seen.clone())).await;

    client_for(addr).fetch_statistics("42").await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["42".to_string()]);
}

#[tokio::test]
async fn empty_identifier_is_still_dispatched() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let addr = serve(recording_router(json!([]), seen.clone())).await;

    client_for(addr).fetch_statistics("").await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![String::new()]);
}

#[tokio::test]
async fn decodes_a_full_series() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let addr = serve(recording_router(json!([1, 2, 3, 4, 5, 6, 7]), seen)).await;

    let series = client_for(addr).fetch_statistics("42").await.unwrap();

    assert_eq!(series.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
}

#[tokio::test]
async fn decodes_an_empty_series() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let addr = serve(recording_router(json!([]), seen)).await;

    let series = client_for(addr).fetch_statistics("42").await.unwrap();

    assert!(series.is_empty());
}

#[tokio::test]
async fn coerces_numeric_strings() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let addr = serve(recording_router(json!(["1", 2, "3.5"]), seen)).await;

    let series = client_for(addr).fetch_statistics("42").await.unwrap();

    assert_eq!(series.values(), &[1.0, 2.0, 3.5]);
}

#[tokio::test]
async fn non_success_status_is_classified() {
    let router = Router::new().route(
        "/grade_statistics/",
        get(|| async { (StatusCode::NOT_FOUND, "no such student") }),
    );
    let addr = serve(router).await;

    let err = client_for(addr).fetch_statistics("42").await.unwrap_err();

    assert!(matches!(err, ClientError::Status { code: 404 }));
    assert_eq!(err.to_failure(), FetchFailure::BadStatus { code: 404 });
}

#[tokio::test]
async fn non_json_body_is_classified_as_decode() {
    let router = Router::new().route("/grade_statistics/", get(|| async { "not json" }));
    let addr = serve(router).await;

    let err = client_for(addr).fetch_statistics("42").await.unwrap_err();

    assert!(matches!(err, ClientError::Decode { .. }));
    assert!(matches!(
        err.to_failure(),
        FetchFailure::InvalidData { .. }
    ));
}

#[tokio::test]
async fn non_numeric_elements_are_classified_as_decode() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let addr = serve(recording_router(json!([1, null, 3]), seen)).await;

    let err = client_for(addr).fetch_statistics("42").await.unwrap_err();

    match err {
        ClientError::Decode { message } => {
            assert!(message.contains("element 1"), "message: {}", message)
        }
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_server_is_classified_as_transport() {
    // Bind and immediately drop to get an address nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).fetch_statistics("42").await.unwrap_err();

    assert!(matches!(err, ClientError::Transport { .. }));
    assert!(matches!(
        err.to_failure(),
        FetchFailure::Unreachable { .. }
    ));
}
