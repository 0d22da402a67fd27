//! End-to-end flows through the router against a mocked upstream

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use confect_http::{AppState, UpstreamGateway, routes};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{header as req_header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> axum::Router {
    let gateway = UpstreamGateway::new(server.uri()).unwrap();
    routes::router(AppState::new(Arc::new(gateway), false))
}

fn post_json(uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_cookies(uri: &str, cookies: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookies)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn login_sets_session_cookies_and_returns_capabilities() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-a",
            "refresh_token": "tok-r",
            "user": {"email": "ada@example.test", "role": "admin"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app_for(&server)
        .oneshot(post_json(
            "/api/auth/login",
            &json!({"email": "ada@example.test", "password": "hunter2"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    let access = cookies
        .iter()
        .find(|c| c.starts_with("access_token=tok-a"))
        .expect("access cookie set");
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("Max-Age=1800"));
    let refresh = cookies
        .iter()
        .find(|c| c.starts_with("refresh_token=tok-r"))
        .expect("refresh cookie set");
    assert!(refresh.contains("Max-Age=604800"));

    let body = body_json(response).await;
    assert_eq!(body["succeeded"], json!(true));
    assert_eq!(body["statusCode"], json!(200));
    let data = &body["data"];
    assert_eq!(data["email"], json!("ada@example.test"));
    assert_eq!(data["permissions"]["canManageUsers"], json!(true));
    assert!(data.get("access_token").is_none());
}

#[tokio::test]
async fn failed_login_sets_no_cookies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})))
        .mount(&server)
        .await;

    let response = app_for(&server)
        .oneshot(post_json(
            "/api/auth/login",
            &json!({"email": "ada@example.test", "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());

    let body = body_json(response).await;
    assert_eq!(body["succeeded"], json!(false));
    assert_eq!(body["message"], json!("Invalid credentials"));
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn malformed_login_body_is_a_400_envelope() {
    let server = MockServer::start().await;

    let response = app_for(&server)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["succeeded"], json!(false));
    assert_eq!(body["statusCode"], json!(400));
}

#[tokio::test]
async fn me_reuses_the_access_cookie_without_refreshing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(req_header("authorization", "Bearer tok-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "staff@example.test",
            "role": "staff",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = app_for(&server)
        .oneshot(get_with_cookies(
            "/api/auth/me",
            "access_token=tok-a; refresh_token=tok-r",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let data = &body["data"];
    assert_eq!(data["permissions"]["canManageOrders"], json!(true));
    assert_eq!(data["permissions"]["canManageUsers"], json!(false));
}

#[tokio::test]
async fn expired_session_is_rotated_transparently_mid_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(req_header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "rotated",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(req_header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let response = app_for(&server)
        .oneshot(get_with_cookies(
            "/api/orders",
            "access_token=stale; refresh_token=tok-r",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // The rotated pair rides the response
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("access_token=fresh")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=rotated")));
}

#[tokio::test]
async fn logout_clears_cookies_even_when_upstream_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = app_for(&server)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, "access_token=tok-a; refresh_token=tok-r")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("access_token=") && c.contains("Max-Age=0"))
    );
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("refresh_token=") && c.contains("Max-Age=0"))
    );
}

#[tokio::test]
async fn analytics_overview_degrades_recent_orders_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/analytics/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalOrders": 12})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&server)
        .await;

    let response = app_for(&server)
        .oneshot(get_with_cookies(
            "/api/analytics/overview",
            "access_token=tok-a; refresh_token=tok-r",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["stats"]["totalOrders"], json!(12));
    assert_eq!(body["data"]["recentOrders"], json!([]));
}

#[tokio::test]
async fn analytics_overview_fails_when_stats_fail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/analytics/stats"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Admins only"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let response = app_for(&server)
        .oneshot(get_with_cookies(
            "/api/analytics/overview",
            "access_token=tok-a; refresh_token=tok-r",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["succeeded"], json!(false));
    assert_eq!(body["message"], json!("Admins only"));
}
