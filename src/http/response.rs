//! Translation of forwarded-call outcomes into HTTP responses.
//!
//! # Design Decisions
//! - Upstream responses (success or error) pass through with their original
//!   status and body; the gateway adds nothing
//! - Failures the gateway itself produces (circuit open, retries exhausted)
//!   carry a machine-readable `error.code` so callers can distinguish a
//!   fast-fail from an exhausted upstream

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::upstream::RequestOutcome;

impl IntoResponse for RequestOutcome {
    fn into_response(self) -> Response {
        match self {
            RequestOutcome::Success(payload) => (StatusCode::OK, Json(payload)).into_response(),
            RequestOutcome::Failure { status, body, .. } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
                (status, Json(body)).into_response()
            }
        }
    }
}
