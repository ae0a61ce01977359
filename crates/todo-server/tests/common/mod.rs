#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use time::macros::datetime;
use todo_app::TodoService;
use todo_app::config::PaginationConfig;
use todo_core::ManualClock;
use todo_server::{AppState, routes};
use todo_store_memory::MemoryStore;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(datetime!(2025-05-01 08:00 UTC)));
        let service = TodoService::with_clock(MemoryStore::new(), clock.clone());
        let router = routes(AppState::new(service, PaginationConfig::default()));
        Self { router, clock }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap_or_else(|err| panic!("request: {err}"));
        self.dispatch(request).await
    }

    pub async fn send_raw(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap_or_else(|err| panic!("request: {err}"));
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|err| panic!("router: {err}"));
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap_or_else(|err| panic!("body: {err}"))
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|err| panic!("json body: {err}"))
        };
        (status, json)
    }

    pub async fn create(&self, text: &str, priority: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/todos",
                Some(serde_json::json!({ "text": text, "priority": priority })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body
    }
}

pub fn id_of(todo: &Value) -> String {
    todo["id"]
        .as_str()
        .unwrap_or_else(|| panic!("todo without id: {todo}"))
        .to_owned()
}
