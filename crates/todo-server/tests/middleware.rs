use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use todo_app::TodoService;
use todo_app::config::{ListenConfig, PaginationConfig};
use todo_server::{AppState, router};
use todo_store_memory::MemoryStore;
use tower::ServiceExt;

const ALLOWED: &str = "http://localhost:8080";

fn state() -> AppState {
    AppState::new(TodoService::new(MemoryStore::new()), PaginationConfig::default())
}

fn app() -> Router {
    router(state(), &ListenConfig::default())
        .unwrap_or_else(|err| panic!("default listen config builds a router: {err}"))
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/todos")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap_or_else(|err| panic!("request: {err}"))
}

#[tokio::test]
async fn preflight_from_configured_origin_is_allowed() {
    let response = app()
        .oneshot(preflight(ALLOWED))
        .await
        .unwrap_or_else(|err| panic!("router: {err}"));

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some(ALLOWED)
    );
    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(methods.contains("POST"), "allowed methods: {methods}");
}

#[tokio::test]
async fn preflight_from_other_origin_gets_no_grant() {
    let response = app()
        .oneshot(preflight("https://elsewhere.example"))
        .await
        .unwrap_or_else(|err| panic!("router: {err}"));

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn simple_request_carries_allow_origin() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, ALLOWED)
        .body(Body::empty())
        .unwrap_or_else(|err| panic!("request: {err}"));
    let response = app()
        .oneshot(request)
        .await
        .unwrap_or_else(|err| panic!("router: {err}"));

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some(ALLOWED)
    );
}

#[test]
fn origin_that_is_not_a_header_value_is_rejected() {
    let listen = ListenConfig {
        cors_origins: vec!["http://bad\norigin".into()],
        ..ListenConfig::default()
    };
    let Err(err) = router(state(), &listen) else {
        panic!("control characters in an origin should fail the build");
    };
    assert!(err.to_string().contains("invalid CORS origin"));
}
