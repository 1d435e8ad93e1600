// In-process mock of the admin backend

#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Path, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use console_client::{ClientConfig, HttpClient, SessionContext};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const EDITOR_TOKEN: &str = "editor-token";
/// Token whose auth answers come wrapped in a `data` envelope
pub const ENVELOPED_TOKEN: &str = "enveloped-token";
pub const PASSWORD: &str = "correct horse";
pub const OTP_CODE: &str = "123456";

#[derive(Clone, Default)]
pub struct Counters {
    me: Arc<AtomicUsize>,
    logout: Arc<AtomicUsize>,
}

impl Counters {
    pub fn me_calls(&self) -> usize {
        self.me.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout.load(Ordering::SeqCst)
    }
}

pub struct Backend {
    pub base_url: String,
    pub counters: Counters,
}

impl Backend {
    pub async fn spawn() -> Self {
        let counters = Counters::default();
        let app = Router::new().nest("/api", routes()).with_state(counters.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            counters,
        }
    }

    pub fn client(&self, session: SessionContext) -> HttpClient {
        HttpClient::new(&ClientConfig::new(&self.base_url), session).unwrap()
    }
}

fn routes() -> Router<Counters> {
    Router::new()
        .route("/echo", get(echo).post(echo).put(echo).patch(echo))
        .route("/empty", get(empty))
        .route("/text", get(text))
        .route("/limited", get(limited))
        .route("/coded", get(coded))
        .route("/unmapped", get(unmapped))
        .route("/leaky", get(leaky))
        .route("/broken", get(broken))
        .route("/auth/login", post(login))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        .route("/products", get(products).post(create_product))
        .route("/products/{id}", delete(remove_product).put(echo).patch(echo))
        .route("/products/{id}/image", post(upload_image))
        .route("/gift-config", get(gift_config))
        .route("/orders/export", get(export_orders))
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

async fn echo(RawQuery(query): RawQuery, headers: HeaderMap, body: Bytes) -> Json<Value> {
    Json(json!({
        "query": query,
        "authorization": header_str(&headers, header::AUTHORIZATION),
        "contentType": header_str(&headers, header::CONTENT_TYPE),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn text() -> &'static str {
    "plain ok"
}

async fn limited() -> StatusCode {
    StatusCode::TOO_MANY_REQUESTS
}

async fn coded() -> Response {
    error(
        StatusCode::CONFLICT,
        json!({ "code": "DUPLICATE_SLUG", "message": "E11000 duplicate key error collection: products" }),
    )
}

async fn unmapped() -> Response {
    error(
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "code": "NAME_REQUIRED", "message": "Name is required" }),
    )
}

async fn leaky() -> Response {
    error(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "MongoServerError: connection pool closed" }),
    )
}

async fn broken() -> Response {
    (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return error(
            StatusCode::UNAUTHORIZED,
            json!({ "code": "INVALID_CREDENTIALS", "message": "bad password" }),
        );
    }
    match body["email"].as_str() {
        Some("admin@shop.test") => Json(json!({ "token": ADMIN_TOKEN })).into_response(),
        Some("editor@shop.test") => Json(json!({ "token": EDITOR_TOKEN })).into_response(),
        Some("enveloped@shop.test") => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "data": { "token": ENVELOPED_TOKEN } })),
        )
            .into_response(),
        Some("otp@shop.test") => {
            Json(json!({ "otpRequired": true, "message": "Code sent to your inbox" })).into_response()
        }
        _ => Json(json!({ "success": true })).into_response(),
    }
}

async fn verify_otp(Json(body): Json<Value>) -> Response {
    if body["code"] == OTP_CODE {
        Json(json!({ "token": ADMIN_TOKEN })).into_response()
    } else {
        error(
            StatusCode::BAD_REQUEST,
            json!({ "code": "INVALID_OTP", "message": "Invalid code" }),
        )
    }
}

async fn resend_otp() -> Json<Value> {
    Json(json!({ "message": "sent" }))
}

async fn me(State(counters): State<Counters>, headers: HeaderMap) -> Response {
    counters.me.fetch_add(1, Ordering::SeqCst);
    let token = header_str(&headers, header::AUTHORIZATION)
        .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string));
    match token.as_deref() {
        Some(ADMIN_TOKEN) => Json(json!({
            "user": { "_id": "u-admin", "role": "admin", "email": "admin@shop.test", "name": "Ada" }
        }))
        .into_response(),
        Some(EDITOR_TOKEN) => Json(json!({ "_id": "u-editor", "role": "editor" })).into_response(),
        Some(ENVELOPED_TOKEN) => Json(json!({
            "success": true,
            "data": { "_id": "u-env", "id": "u-env", "role": "Admin", "email": "env@shop.test" }
        }))
        .into_response(),
        _ => error(
            StatusCode::UNAUTHORIZED,
            json!({ "code": "SESSION_EXPIRED", "message": "jwt expired" }),
        ),
    }
}

async fn logout(State(counters): State<Counters>) -> StatusCode {
    counters.logout.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

async fn products(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({
        "data": {
            "items": [{ "_id": "p1", "name": "Mug" }, { "_id": "p2", "name": "Shirt" }],
            "pagination": { "total": 12 }
        },
        "query": query,
    }))
}

async fn create_product(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut created = body;
    created["_id"] = json!("p-new");
    (StatusCode::CREATED, Json(created))
}

async fn remove_product(Path(id): Path<String>) -> Response {
    if id == "missing" {
        return error(
            StatusCode::NOT_FOUND,
            json!({ "code": "PRODUCT_NOT_FOUND", "message": "No product missing" }),
        );
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn upload_image(Path(id): Path<String>, headers: HeaderMap, mut multipart: Multipart) -> Json<Value> {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        fields.push(json!({
            "name": field.name(),
            "fileName": field.file_name(),
            "contentType": field.content_type(),
        }));
    }
    Json(json!({
        "id": id,
        "contentType": header_str(&headers, header::CONTENT_TYPE),
        "fields": fields,
    }))
}

async fn gift_config() -> Json<Value> {
    Json(json!([{ "threshold": 50, "gift": "Sticker" }]))
}

async fn export_orders(RawQuery(query): RawQuery) -> Response {
    let disposition = match query.as_deref() {
        Some("status=paid") => "attachment; filename*=UTF-8''orders%20paid.xlsx",
        Some(_) => "attachment; filename=\"orders-filtered.xlsx\"",
        None => "attachment",
    };
    (
        [
            (header::CONTENT_TYPE, "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        vec![0x50u8, 0x4b, 0x03, 0x04],
    )
        .into_response()
}
