//! API error responses: taxonomy-to-status mapping and the JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quill_gateways::GatewayError;
use serde::Serialize;

/// JSON body returned for every non-success response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An endpoint failure with its HTTP status.
///
/// Every gateway failure is converted here at the handler boundary; no
/// error leaves a handler uncaught.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// A request that failed validation before any upstream call.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: message.into(),
                error: None,
                details: None,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let (status, message, details) = match &err {
            GatewayError::MissingCredential(name) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server is not configured with {name}"),
                None,
            ),
            GatewayError::Auth { message, .. } => (
                StatusCode::FORBIDDEN,
                "Upstream rejected our credentials".to_string(),
                Some(message.clone()),
            ),
            GatewayError::NotFound(path) => (
                StatusCode::NOT_FOUND,
                "Upstream target not found".to_string(),
                Some(path.clone()),
            ),
            GatewayError::Upstream { status, message } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Upstream request failed".to_string(),
                Some(message.clone()),
            ),
            GatewayError::Transport(source) => (
                StatusCode::BAD_GATEWAY,
                "Could not reach the upstream service".to_string(),
                Some(source.to_string()),
            ),
            GatewayError::InvalidFileName(name) => (
                StatusCode::BAD_REQUEST,
                "Invalid file name".to_string(),
                Some(name.clone()),
            ),
        };

        Self {
            status,
            body: ErrorBody {
                message,
                error: Some(err.to_string()),
                details,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_400_without_detail_noise() {
        let err = ApiError::validation("Please enter a file name");

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Please enter a file name");
        assert!(err.body.error.is_none());
    }

    #[test]
    fn maps_the_gateway_taxonomy_to_statuses() {
        let cases = [
            (
                GatewayError::MissingCredential("GITHUB_TOKEN"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GatewayError::Auth {
                    status: 401,
                    message: String::new(),
                },
                StatusCode::FORBIDDEN,
            ),
            (GatewayError::NotFound(String::new()), StatusCode::NOT_FOUND),
            (
                GatewayError::Upstream {
                    status: 422,
                    message: String::new(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                GatewayError::InvalidFileName("../x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (gateway_err, expected) in cases {
            assert_eq!(ApiError::from(gateway_err).status(), expected);
        }
    }

    #[test]
    fn error_body_omits_empty_fields() {
        let json = serde_json::to_string(&ErrorBody {
            message: "m".to_string(),
            error: None,
            details: None,
        })
        .unwrap();

        assert_eq!(json, r#"{"message":"m"}"#);
    }
}
