//! End-to-end tests for the credential endpoints.
//!
//! The full application (middleware, fallbacks, handlers and the real auth
//! service) runs against the in-memory repository and a low-cost bcrypt
//! hasher, so only the PostgreSQL adapter is substituted.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use chat_backend::domain::AuthService;
use chat_backend::inbound::http::app::{AppDependencies, build_app};
use chat_backend::inbound::http::health::HealthState;
use chat_backend::inbound::http::state::HttpState;
use chat_backend::middleware::RateLimit;
use chat_backend::middleware::rate_limit::RateLimitPolicy;
use chat_backend::outbound::crypto::BcryptPasswordHasher;
use chat_backend::test_support::InMemoryUserRepository;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct Harness {
    users: Arc<InMemoryUserRepository>,
    deps: AppDependencies,
}

#[fixture]
fn harness() -> Harness {
    harness_with_policy(RateLimitPolicy::default())
}

fn harness_with_policy(policy: RateLimitPolicy) -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let service = Arc::new(AuthService::new(
        users.clone(),
        Arc::new(BcryptPasswordHasher::new(4)),
    ));
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    Harness {
        users,
        deps: AppDependencies {
            health_state,
            http_state: web::Data::new(HttpState::from_service(service)),
            rate_limit: RateLimit::new(policy),
        },
    }
}

fn post(uri: &str, body: &Value) -> actix_http::Request {
    test::TestRequest::post()
        .uri(uri)
        .peer_addr("192.0.2.10:5000".parse().expect("peer address"))
        .set_json(body)
        .to_request()
}

fn ann() -> Value {
    json!({"name": "Ann", "email": "ann@x.com", "password": "abcde", "username": "ann1"})
}

#[rstest]
#[actix_web::test]
async fn sign_up_then_repeat_conflicts(harness: Harness) {
    let app = test::init_service(build_app(harness.deps.clone())).await;

    let created = test::call_service(&app, post("/auth/signUp", &ann())).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert!(created.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(created).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("User registered successfully"));
    assert!(body["data"]["id"].is_i64());

    let repeated = test::call_service(&app, post("/auth/signUp", &ann())).await;
    assert_eq!(repeated.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(repeated).await;
    assert_eq!(
        body,
        json!({"success": false, "message": "ann@x.com user already exists"})
    );
    assert_eq!(harness.users.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn registered_credentials_log_in(harness: Harness) {
    let app = test::init_service(build_app(harness.deps)).await;
    test::call_service(&app, post("/auth/signUp", &ann())).await;

    let res = test::call_service(
        &app,
        post("/auth/login", &json!({"email": "ann@x.com", "password": "abcde"})),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"success": true, "message": "User logged in successfully"})
    );
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_rejected(harness: Harness) {
    let app = test::init_service(build_app(harness.deps)).await;
    test::call_service(&app, post("/auth/signUp", &ann())).await;

    let res = test::call_service(
        &app,
        post("/auth/login", &json!({"email": "ann@x.com", "password": "wrong"})),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"success": false, "message": "Incorrect password"})
    );
}

#[rstest]
#[actix_web::test]
async fn unknown_email_is_not_found(harness: Harness) {
    let app = test::init_service(build_app(harness.deps)).await;

    let res = test::call_service(
        &app,
        post("/auth/login", &json!({"email": "nobody@x.com", "password": "abcde"})),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("nobody@x.com"))
    );
}

#[rstest]
#[case(
    json!({}),
    json!(["Name is required", "Email is required", "Password is required", "User Name is required"])
)]
#[case(
    json!({"name": "Ann", "email": "ann@x", "password": "abcd", "username": "ann1"}),
    json!(["Invalid email address", "Password must be at least 5 characters"])
)]
#[actix_web::test]
async fn invalid_sign_up_lists_every_issue(
    harness: Harness,
    #[case] payload: Value,
    #[case] expected: Value,
) {
    let app = test::init_service(build_app(harness.deps.clone())).await;

    let res = test::call_service(&app, post("/auth/signUp", &payload)).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"success": false, "message": expected}));
    assert!(harness.users.is_empty());
}

#[rstest]
#[actix_web::test]
async fn duplicate_username_is_a_conflict(harness: Harness) {
    let app = test::init_service(build_app(harness.deps.clone())).await;
    test::call_service(&app, post("/auth/signUp", &ann())).await;

    let res = test::call_service(
        &app,
        post(
            "/auth/signUp",
            &json!({"name": "Bo", "email": "bo@x.com", "password": "abcde", "username": "ann1"}),
        ),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], json!("ann1 username is already taken"));
    assert_eq!(harness.users.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn health_answers_ok_with_security_headers(harness: Harness) {
    let app = test::init_service(build_app(harness.deps)).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("x-content-type-options")
            .and_then(|value| value.to_str().ok()),
        Some("nosniff")
    );
    assert_eq!(test::read_body(res).await.as_ref(), b"ok");
}

#[rstest]
#[actix_web::test]
async fn unknown_route_gives_envelope(harness: Harness) {
    let app = test::init_service(build_app(harness.deps)).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"success": false, "message": "Route not found"}));
}

#[actix_web::test]
async fn rate_limit_rejects_excess_requests() {
    let harness = harness_with_policy(RateLimitPolicy::new(
        Duration::from_secs(900),
        NonZeroU32::MIN,
    ));
    let app = test::init_service(build_app(harness.deps)).await;
    let body = json!({"email": "nobody@x.com", "password": "abcde"});

    let first = test::call_service(&app, post("/auth/login", &body)).await;
    assert_eq!(first.status(), StatusCode::NOT_FOUND);

    let second = test::call_service(&app, post("/auth/login", &body)).await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key("retry-after"));
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["success"], json!(false));
}
