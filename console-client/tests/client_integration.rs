// console-client/tests/client_integration.rs
// Request client against an in-process backend

mod support;

use console_client::{Body, ClientConfig, HttpClient, Query, RequestOptions, SessionContext};
use http::Method;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde_json::{Value, json};
use support::{ADMIN_TOKEN, Backend};

#[tokio::test]
async fn test_query_serialization_on_the_wire() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let query = Query::new()
        .with("tags", vec!["a", "b"])
        .with("empty", "")
        .with("missing", None::<String>)
        .with("q", "mug & cup");
    let body = client.get("/echo", query.into()).await.unwrap();

    assert_eq!(body["query"], "tags=a&tags=b&q=mug%20%26%20cup");
}

#[tokio::test]
async fn test_no_query_string_when_everything_is_empty() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let query = Query::new().with("empty", "").with("list", Vec::<String>::new());
    let body = client.get("/echo", query.into()).await.unwrap();

    assert_eq!(body["query"], Value::Null);
}

#[tokio::test]
async fn test_bearer_attached_only_with_credential() {
    let backend = Backend::spawn().await;
    let session = SessionContext::in_memory();
    let client = backend.client(session.clone());

    let anonymous = client.get("/echo", RequestOptions::new()).await.unwrap();
    assert_eq!(anonymous["authorization"], Value::Null);

    session.set_credential(ADMIN_TOKEN).unwrap();
    let signed = client.get("/echo", RequestOptions::new()).await.unwrap();
    assert_eq!(signed["authorization"], format!("Bearer {ADMIN_TOKEN}"));
}

#[tokio::test]
async fn test_json_body_sets_content_type() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let body = client
        .post("/echo", Some(Body::json(&json!({ "name": "Mug" })).unwrap()), RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(body["contentType"], "application/json");
    assert_eq!(body["body"], r#"{"name":"Mug"}"#);
}

#[tokio::test]
async fn test_caller_content_type_wins() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let options = RequestOptions::new().with_header("Content-Type", "application/merge-patch+json");
    let body = client
        .patch("/echo", Some(json!({ "price": 10 }).into()), options)
        .await
        .unwrap();

    assert_eq!(body["contentType"], "application/merge-patch+json");
}

#[tokio::test]
async fn test_multipart_body_never_sent_as_json() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let form = Form::new().text("title", "Summer banner");
    let body = client
        .post("/echo", Some(Body::Multipart(form)), RequestOptions::new())
        .await
        .unwrap();

    let content_type = body["contentType"].as_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="), "{content_type}");
}

#[tokio::test]
async fn test_no_content_is_null() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let body = client.get("/empty", RequestOptions::new()).await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_non_json_success_is_raw_text() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let body = client.get("/text", RequestOptions::new()).await.unwrap();
    assert_eq!(body, Value::String("plain ok".into()));
}

#[tokio::test]
async fn test_rate_limited_without_code() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let err = client.get("/limited", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.status, 429);
    assert_eq!(err.code, "RATE_LIMITED");
    assert_eq!(err.message, "Request failed: GET /limited");
    assert_eq!(
        err.friendly_message,
        "Too many requests. Please slow down and try again shortly."
    );
    assert!(err.response.is_none());
}

#[tokio::test]
async fn test_mapped_code_beats_leaky_message() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let err = client.get("/coded", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.status, 409);
    assert_eq!(err.code, "DUPLICATE_SLUG");
    assert!(err.message.starts_with("E11000"));
    assert_eq!(
        err.friendly_message,
        "That slug is already in use. Choose a different one."
    );
    assert_eq!(err.response.as_ref().unwrap()["code"], "DUPLICATE_SLUG");
}

#[tokio::test]
async fn test_unmapped_code_surfaces_safe_message() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let err = client.get("/unmapped", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.code, "NAME_REQUIRED");
    assert_eq!(err.friendly_message, "Name is required");
}

#[tokio::test]
async fn test_leaky_message_hidden() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let err = client.get("/leaky", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.status, 500);
    assert_eq!(err.code, "HTTP_ERROR");
    assert_eq!(
        err.friendly_message,
        "Something went wrong on our side. Please try again."
    );
}

#[tokio::test]
async fn test_non_json_error_body_kept_as_text() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let err = client.get("/broken", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.status, 502);
    assert_eq!(err.message, "Request failed: GET /broken");
    assert_eq!(err.response, Some(Value::String("upstream unavailable".into())));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(format!("http://{addr}/api"));
    let client = HttpClient::new(&config, SessionContext::in_memory()).unwrap();

    let err = client.get("/echo", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.status, 0);
    assert_eq!(err.code, "NETWORK_ERROR");
    assert!(err.response.is_none());
    assert!(err.is_network());
    assert_eq!(
        err.friendly_message,
        "Unable to reach the server. Check your connection."
    );
}

#[derive(Debug, Deserialize)]
struct Strict {
    #[allow(dead_code)]
    required: String,
}

#[tokio::test]
async fn test_unexpected_shape_is_invalid_response() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let err = client
        .get_json::<Strict>("/echo", RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.status, 200);
    assert_eq!(err.code, "INVALID_RESPONSE");
}

#[tokio::test]
async fn test_send_json_with_put() {
    let backend = Backend::spawn().await;
    let client = backend.client(SessionContext::in_memory());

    let echoed: Value = client
        .send_json(Method::PUT, "/echo", &json!({ "active": false }))
        .await
        .unwrap();
    assert_eq!(echoed["body"], r#"{"active":false}"#);
}
