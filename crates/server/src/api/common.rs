// Common DTOs and error mapping for the public API
//
// Every handler returns `Result<_, ApiError>`; domain errors become a status
// code plus an `ErrorResponse` body carrying a stable `code`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rollcall_core::RollcallError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::ValidationError;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
    /// Stable machine-readable error kind.
    #[schema(example = "EVENT_NOT_FOUND")]
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(error, code),
        }
    }
}

/// Status code for a domain error.
///
/// `InvalidCapacity` is a 404: the event cannot be updated into that shape.
/// Store outages are a 400 on every route.
pub fn status_for(err: &RollcallError) -> StatusCode {
    match err {
        RollcallError::EventNotFound(_)
        | RollcallError::ParticipantNotFound { .. }
        | RollcallError::InvalidCapacity { .. } => StatusCode::NOT_FOUND,
        RollcallError::EventAlreadyExists(_)
        | RollcallError::DuplicateParticipant { .. }
        | RollcallError::CapacityExceeded { .. }
        | RollcallError::Validation(_)
        | RollcallError::StoreUnavailable(_) => StatusCode::BAD_REQUEST,
        RollcallError::Conflict { .. } => StatusCode::CONFLICT,
    }
}

impl From<RollcallError> for ApiError {
    fn from(err: RollcallError) -> Self {
        match &err {
            RollcallError::StoreUnavailable(_) => tracing::error!("Store request failed: {}", err),
            RollcallError::Conflict { .. } => tracing::warn!("{}", err),
            _ => tracing::debug!("Request rejected: {}", err),
        }
        Self::new(status_for(&err), err.to_string(), err.code())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string(), "VALIDATION_ERROR")
    }
}

// Malformed bodies are a 400 like any other invalid input
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            rejection.body_text(),
            "VALIDATION_ERROR",
        )
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
    fn test_status_mapping() {
        let cases = [
            (RollcallError::EventNotFound("e1".into()), 404),
            (RollcallError::participant_not_found("e1", "p1"), 404),
            (
                RollcallError::InvalidCapacity {
                    capacity: 1,
                    participants: 2,
                },
                404,
            ),
            (RollcallError::EventAlreadyExists("e1".into()), 400),
            (RollcallError::duplicate_participant("e1", "p1"), 400),
            (
                RollcallError::CapacityExceeded {
                    event_id: "e1".into(),
                    capacity: 2,
                },
                400,
            ),
            (RollcallError::validation("bad"), 400),
            (RollcallError::StoreUnavailable("down".into()), 400),
            (
                RollcallError::Conflict {
                    event_id: "e1".into(),
                    attempts: 3,
                },
                409,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err).as_u16(), status, "{err:?}");
        }
    }

    #[test]
    fn test_error_body_carries_code() {
        let err = ApiError::from(RollcallError::EventNotFound("e1".into()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.body.code, "EVENT_NOT_FOUND");
        assert!(err.body.error.contains("e1"));
    }
}
