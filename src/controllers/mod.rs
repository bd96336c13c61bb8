pub mod bookings;
pub mod seats;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::BookingError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(seats::routes())
        .merge(bookings::routes())
        .merge(bookings::reset_route())
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::CapacityExceeded { .. } => StatusCode::CONFLICT,
            BookingError::GapViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::NothingSelected => StatusCode::BAD_REQUEST,
            BookingError::SeatNotFound { .. } => StatusCode::NOT_FOUND,
            BookingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BookingError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
            BookingError::Snapshot(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("booking request failed: {}", self);
        } else {
            tracing::debug!("booking request rejected: {}", self);
        }

        let body = Json(json!({
            "success": false,
            "error": self.code(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        BookingError::InvalidRequest(rejection.body_text())
    }
}
