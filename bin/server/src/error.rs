//! Domain error types for API handlers.
//!
//! Failure policy differs per boundary: the session exchange surfaces
//! credential problems as hard errors (an explicit user action expects
//! success), while the session validator downgrades them to a normal
//! "unauthenticated" result and never produces these errors at all.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors surfaced by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The exchange request carried no identity token.
    MissingIdToken,
    /// A booking request was missing required fields.
    MissingFields,
    /// The supplied identity token failed verification.
    InvalidIdToken { detail: String },
    /// Internal fault. The detail is populated only under a
    /// development configuration and suppressed otherwise.
    Internal { detail: Option<String> },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingIdToken => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Missing idToken"})),
            )
                .into_response(),
            Self::MissingFields => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Missing fields"})),
            )
                .into_response(),
            Self::InvalidIdToken { detail } => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "Invalid ID token", "detail": detail})),
            )
                .into_response(),
            Self::Internal { detail } => {
                let body = match detail {
                    Some(detail) => {
                        serde_json::json!({"error": "Internal server error", "detail": detail})
                    }
                    None => serde_json::json!({"error": "Internal server error"}),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_id_token_maps_to_400() {
        let response = ApiError::MissingIdToken.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_id_token_maps_to_401() {
        let response = ApiError::InvalidIdToken {
            detail: "token has expired".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_maps_to_500() {
        let response = ApiError::Internal { detail: None }.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
