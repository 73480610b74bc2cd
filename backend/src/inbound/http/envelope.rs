//! Uniform response envelope.
//!
//! Every JSON response, success or failure, has the shape
//! `{success, message?, data?}`. `success` is derived from the status code
//! alone so handlers cannot produce a contradictory body.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::Message;

/// Response body shared by all JSON endpoints.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use chat_backend::inbound::http::envelope::Envelope;
///
/// let body = Envelope::<()>::new(StatusCode::NOT_FOUND, Some("gone".into()), None);
/// assert!(!body.success);
/// assert_eq!(serde_json::to_value(&body).unwrap()["message"], "gone");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the status was 2xx.
    pub success: bool,
    /// Human-readable outcome; a list when validation found several issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    /// Endpoint-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Build the envelope for a response sent with `status`.
    pub fn new(status: StatusCode, message: Option<Message>, data: Option<T>) -> Self {
        Self {
            success: status.is_success(),
            message,
            data,
        }
    }
}

/// Send `message` and `data` wrapped in an [`Envelope`] with `status`.
pub fn send_response<T: Serialize>(
    status: StatusCode,
    message: Option<Message>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status).json(Envelope::new(status, message, data))
}

/// Send a message-only envelope.
pub fn send_message(status: StatusCode, message: impl Into<Message>) -> HttpResponse {
    send_response::<()>(status, Some(message.into()), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(StatusCode::OK, true)]
    #[case(StatusCode::CREATED, true)]
    #[case(StatusCode::BAD_REQUEST, false)]
    #[case(StatusCode::NOT_FOUND, false)]
    #[case(StatusCode::TOO_MANY_REQUESTS, false)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn success_follows_status(#[case] status: StatusCode, #[case] expected: bool) {
        assert_eq!(Envelope::<()>::new(status, None, None).success, expected);
    }

    #[rstest]
    fn absent_fields_are_omitted() {
        let body = Envelope::<()>::new(StatusCode::OK, None, None);
        assert_eq!(serde_json::to_value(&body).expect("serialise"), json!({"success": true}));
    }

    #[rstest]
    fn message_lists_serialise_as_arrays() {
        let body = Envelope::<()>::new(
            StatusCode::BAD_REQUEST,
            Some(Message::from(vec!["Name is required".to_owned()])),
            None,
        );
        assert_eq!(
            serde_json::to_value(&body).expect("serialise"),
            json!({"success": false, "message": ["Name is required"]})
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn send_response_sets_status_and_body() {
        let response = send_response(
            StatusCode::CREATED,
            Some("done".into()),
            Some(json!({"id": 4})),
        );
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = to_bytes(response.into_body()).await.expect("body");
        let value: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(value, json!({"success": true, "message": "done", "data": {"id": 4}}));
    }
}
