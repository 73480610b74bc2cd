//! Process-wide fallbacks that keep every response inside the envelope.
//!
//! - [`json_config`] turns body extraction failures into 400 envelopes.
//! - [`route_not_found`] answers unknown routes with a 404 envelope.
//! - [`internal_error_handlers`] replaces any remaining 500 body with the
//!   generic failure envelope.

use actix_web::dev::ServiceResponse;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, web};
use tracing::{debug, warn};

use crate::domain::Error;

use super::ApiResult;
use super::envelope::send_message;
use super::error::GENERIC_FAILURE_MESSAGE;

/// Upper bound on accepted JSON bodies.
pub const JSON_BODY_LIMIT: usize = 16 * 1024;

fn payload_error_message(error: &JsonPayloadError) -> &'static str {
    match error {
        JsonPayloadError::ContentType => "Content-Type must be application/json",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large"
        }
        _ => "Request body is not valid JSON",
    }
}

/// JSON extractor settings shared by every handler.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            debug!(error = %err, "rejected request body");
            Error::invalid_request(payload_error_message(&err)).into()
        })
}

/// Default service for unmatched routes.
pub async fn route_not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("Route not found"))
}

fn replace_internal_body<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let is_envelope = res
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if is_envelope {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    warn!(path = res.request().path(), "replacing unstructured 500 response");
    let (req, _) = res.into_parts();
    let response = send_message(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_MESSAGE);
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

/// Middleware that rewrites unstructured 500 responses.
///
/// Responses already rendered as JSON envelopes (domain errors) pass through
/// untouched since they are redacted at construction.
pub fn internal_error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, replace_internal_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[derive(Deserialize)]
    struct Body {
        #[expect(dead_code, reason = "only deserialisation is exercised")]
        name: String,
    }

    async fn echo(_body: web::Json<Body>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn plain_failure() -> HttpResponse {
        HttpResponse::InternalServerError().body("stack trace: db at 10.0.0.3")
    }

    async fn enveloped_failure() -> ApiResult<HttpResponse> {
        Err(Error::internal("detail"))
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_gives_a_400_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/", web::post().to(echo)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();

        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"success": false, "message": "Request body is not valid JSON"})
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_routes_give_a_404_envelope() {
        let app =
            test::init_service(App::new().default_service(web::to(route_not_found))).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"success": false, "message": "Route not found"}));
    }

    #[rstest]
    #[case("/plain")]
    #[case("/enveloped")]
    #[actix_web::test]
    async fn server_errors_always_carry_the_generic_envelope(#[case] path: &str) {
        let app = test::init_service(
            App::new()
                .wrap(internal_error_handlers())
                .route("/plain", web::get().to(plain_failure))
                .route("/enveloped", web::get().to(enveloped_failure)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"success": false, "message": GENERIC_FAILURE_MESSAGE})
        );
    }
}
