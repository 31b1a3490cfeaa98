mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use tower::ServiceExt;

use chirp_api::bootstrap::server::build_app;
use chirp_api::presentation::http::mount;
use common::{body_json, request, test_config, test_ctx};

#[tokio::test]
async fn unmatched_paths_get_a_json_404() {
    let app = build_app(test_ctx(test_config("development")));
    let res = request(&app, Method::GET, "/no/such/route", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["message"], "/no/such/route not found");
}

#[tokio::test]
async fn cors_preflight_reflects_the_configured_policy() {
    let app = build_app(test_ctx(test_config("development")));
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/signin")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();

    assert_eq!(
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
    let methods = res
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    for m in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(m), "missing {m} in {methods}");
    }
    assert!(!methods.contains("PATCH"), "unexpected PATCH in {methods}");
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = build_app(test_ctx(test_config("development")));
    let res = request(&app, Method::GET, "/api/v1/signout", None).await;
    assert_eq!(res.headers().get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(res.headers().get("x-frame-options").unwrap(), "DENY");
    // No HSTS over development plain HTTP
    assert!(res.headers().get("strict-transport-security").is_none());

    let app = build_app(test_ctx(test_config("staging")));
    let res = request(&app, Method::GET, "/api/v1/signout", None).await;
    assert!(res.headers().get("strict-transport-security").is_some());
}

#[tokio::test]
async fn route_table_mounts_are_independent() {
    let ctx_a = test_ctx(test_config("development"));
    let ctx_b = test_ctx(test_config("development"));
    let app_a = mount(Router::new(), ctx_a);
    let app_b = mount(Router::new(), ctx_b);

    for app in [&app_a, &app_b] {
        let res = request(app, Method::GET, "/api/v1/signout", None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
    drop(app_a);
    let res = request(&app_b, Method::GET, "/api/v1/signout", None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_signin_currentuser_flow() {
    let app = build_app(test_ctx(test_config("development")));

    let res = request(
        &app,
        Method::POST,
        "/api/v1/signup",
        Some(serde_json::json!({
            "username": "amber",
            "email": "amber@example.com",
            "password": "hunter22"
        })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"), "dev cookie must not be Secure");
    let body = body_json(res).await;
    assert_eq!(body["user"]["email"], "amber@example.com");

    // Duplicate email is rejected
    let res = request(
        &app,
        Method::POST,
        "/api/v1/signup",
        Some(serde_json::json!({
            "username": "amber2",
            "email": "amber@example.com",
            "password": "hunter23"
        })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Sign in with the right and wrong password
    let res = request(
        &app,
        Method::POST,
        "/api/v1/signin",
        Some(serde_json::json!({
            "email": "amber@example.com",
            "password": "wrong"
        })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Invalid credentials");
    assert_eq!(body["statusCode"], 400);

    let res = request(
        &app,
        Method::POST,
        "/api/v1/signin",
        Some(serde_json::json!({
            "email": "amber@example.com",
            "password": "hunter22"
        })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // The issued session opens the gated route
    let session = cookie.split(';').next().unwrap().to_string();
    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/currentuser")
        .header(header::COOKIE, session)
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["isUser"], true);
    assert_eq!(body["user"]["username"], "amber");
}

#[tokio::test]
async fn currentuser_without_a_session_is_unauthorized() {
    let app = build_app(test_ctx(test_config("development")));
    let res = request(&app, Method::GET, "/api/v1/currentuser", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Token is invalid. Please login again.");
    assert_eq!(body["status"], "error");
    assert_eq!(body["statusCode"], 401);
}

#[tokio::test]
async fn secure_cookie_outside_development() {
    let app = build_app(test_ctx(test_config("staging")));
    let res = request(
        &app,
        Method::POST,
        "/api/v1/signup",
        Some(serde_json::json!({
            "username": "beto",
            "email": "beto@example.com",
            "password": "hunter22"
        })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.contains("; Secure"));
}

#[tokio::test]
async fn signout_expires_the_session_cookie() {
    let app = build_app(test_ctx(test_config("development")));
    let res = request(&app, Method::GET, "/api/v1/signout", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("session=;"));
    assert!(cookie.contains("Max-Age=0"));
    let body = body_json(res).await;
    assert_eq!(body["message"], "Logout successful");
}

#[tokio::test]
async fn queue_dashboard_degrades_when_the_broker_is_down() {
    let app = build_app(test_ctx(test_config("development")));
    let res = request(&app, Method::GET, "/queues", None).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(res).await;
    assert_eq!(body["statusCode"], 503);

    let res = request(&app, Method::GET, "/queues/not-a-queue", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_mounted_under_the_base_path() {
    let app = build_app(test_ctx(test_config("development")));
    let res = request(&app, Method::GET, "/api/v1/health", None).await;
    // The lazy test pool has no live database behind it
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["status"], "degraded");
}
