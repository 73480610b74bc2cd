//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("envelope JSON");
    (status, trace_id, body)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("Incorrect password"), StatusCode::BAD_REQUEST)]
#[case(Error::conflict("taken"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::rate_limited("slow down"), StatusCode::TOO_MANY_REQUESTS)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_their_message(expected_trace_id: String) {
    let error = Error::conflict("ann@x.com user already exists").with_trace_id(expected_trace_id);

    let (status, trace_id, body) = render(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(trace_id.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({"success": false, "message": "ann@x.com user already exists"})
    );
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection refused by 10.0.0.3").with_trace_id(expected_trace_id);

    let (status, trace_id, body) = render(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(trace_id.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({"success": false, "message": GENERIC_FAILURE_MESSAGE})
    );
}

#[rstest]
#[actix_web::test]
async fn validation_lists_are_rendered_as_arrays() {
    let error = Error::validation(vec![
        "Name is required".to_owned(),
        "User Name is required".to_owned(),
    ]);

    let (_, trace_id, body) = render(&error).await;

    assert!(trace_id.is_none());
    assert_eq!(
        body["message"],
        json!(["Name is required", "User Name is required"])
    );
}

#[rstest]
fn actix_errors_become_generic_internal_errors() {
    let actix_error = actix_web::error::ErrorBadGateway("upstream said no");
    let error = Error::from(actix_error);

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), &Message::from(GENERIC_FAILURE_MESSAGE));
}
