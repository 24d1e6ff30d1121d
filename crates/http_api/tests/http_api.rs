use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use app_api::AppContext;
use portfolio_app::{AppPaths, AppState, ensure_app_data_dir};

use http_api::HttpState;

struct TestApp {
    _temp_dir: tempfile::TempDir,
    router: axum::Router,
}

fn build_app() -> TestApp {
    build_app_with(|state| state)
}

fn build_app_with(configure: impl FnOnce(HttpState) -> HttpState) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::new(temp_dir.path().to_path_buf());
    ensure_app_data_dir(&paths).expect("ensure app data dir");
    let app_state = AppState::new(paths.db_path, false);
    app_state.initialize().expect("initialize");

    let context = AppContext { app_state };
    let router = http_api::router(configure(HttpState::new(context)));

    TestApp {
        _temp_dir: temp_dir,
        router,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("response");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let payload = serde_json::from_slice(&body).expect("json body");
    (status, payload)
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn peer(ip: &str) -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::new(ip.parse().expect("ip"), 40_000))
}

fn view_from(ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analytics/views/demo")
        .extension(peer(ip))
        .header(header::USER_AGENT, "integration-test")
        .body(Body::empty())
        .expect("request")
}

fn view_forwarded(peer_ip: &str, forwarded_for: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analytics/views/demo")
        .extension(peer(peer_ip))
        .header("x-forwarded-for", forwarded_for)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn forwarded_header_is_ignored_by_default() {
    let app = build_app();
    let mut last = Value::Null;
    for hop in 0..5 {
        let (status, payload) =
            send(&app, view_forwarded("198.51.100.7", &format!("1.1.1.{hop}"))).await;
        assert_eq!(status, StatusCode::OK);
        last = payload;
    }
    assert_eq!(last["view_count"], 5);
    assert_eq!(last["unique_visitors"], 1);
}

#[tokio::test]
async fn forwarded_header_identifies_visitors_when_trusted() {
    let app = build_app_with(|state| state.with_trusted_forwarded_for(true));
    send(&app, view_forwarded("10.0.0.1", "203.0.113.1")).await;
    let (_, payload) = send(&app, view_forwarded("10.0.0.1", "203.0.113.2, 10.0.0.1")).await;
    assert_eq!(payload["view_count"], 2);
    assert_eq!(payload["unique_visitors"], 2);
}

#[tokio::test]
async fn unknown_project_returns_zero_counts() {
    let app = build_app();
    let (status, payload) = send(&app, request("GET", "/api/analytics/views/nobody")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["view_count"], 0);
    assert_eq!(payload["unique_visitors"], 0);
}

#[tokio::test]
async fn recording_views_dedupes_visitors() {
    let app = build_app();

    let (status, first) = send(&app, view_from("203.0.113.1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["view_count"], 1);
    assert_eq!(first["unique_visitors"], 1);

    let (_, second) = send(&app, view_from("203.0.113.1")).await;
    assert_eq!(second["view_count"], 2);
    assert_eq!(second["unique_visitors"], 1);

    let (_, third) = send(&app, view_from("203.0.113.2")).await;
    assert_eq!(third["view_count"], 3);
    assert_eq!(third["unique_visitors"], 2);

    let (_, current) = send(&app, request("GET", "/api/analytics/views/demo")).await;
    assert_eq!(current["project_id"], "demo");
    assert_eq!(current["view_count"], 3);
}

#[tokio::test]
async fn summary_lists_projects_by_views() {
    let app = build_app();
    send(&app, view_from("203.0.113.1")).await;
    send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/analytics/views/other")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    send(&app, view_from("203.0.113.2")).await;

    let (status, payload) = send(&app, request("GET", "/api/analytics/summary")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = payload["analytics"].as_array().expect("analytics array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["project_id"], "demo");
    assert_eq!(rows[1]["project_id"], "other");
}

#[tokio::test]
async fn reactions_round_trip_and_floor_at_zero() {
    let app = build_app();

    let (status, added) = send(&app, request("POST", "/api/reactions/demo/like")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["new_count"], 1);
    assert_eq!(added["reaction_type"], "like");

    send(&app, request("POST", "/api/reactions/demo/wow")).await;
    let (_, listed) = send(&app, request("GET", "/api/reactions/demo")).await;
    assert_eq!(listed["total"], 2);
    assert_eq!(listed["reactions"]["wow"], 1);

    send(&app, request("DELETE", "/api/reactions/demo/like")).await;
    let (status, removed) = send(&app, request("DELETE", "/api/reactions/demo/like")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["new_count"], 0);

    let (_, summary) = send(&app, request("GET", "/api/reactions")).await;
    assert_eq!(summary["reactions_summary"]["demo"]["like"], 0);
    assert_eq!(summary["reactions_summary"]["demo"]["wow"], 1);
}

#[tokio::test]
async fn invalid_reaction_type_is_rejected() {
    let app = build_app();

    let (status, payload) = send(&app, request("POST", "/api/reactions/demo/bogus-type")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], "invalid_reaction");
    assert_eq!(payload["valid_types"].as_array().map(Vec::len), Some(5));

    let (status, _) = send(&app, request("DELETE", "/api/reactions/demo/bogus-type")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, summary) = send(&app, request("GET", "/api/reactions")).await;
    assert_eq!(summary["reactions_summary"], serde_json::json!({}));
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let app = build_app();
    let (status, payload) = send(&app, request("GET", "/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["code"], "not_found");
}
