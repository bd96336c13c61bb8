use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::engine::{BookingReceipt, SelectionSummary};
use crate::error::BookingError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/bookings", post(book_seats))
}

pub fn reset_route() -> Router<Arc<AppState>> {
    Router::new().route("/reset", post(reset_all))
}

/* ---------- BOOKINGS ---------- */

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub receipt: BookingReceipt,
    pub summary: SelectionSummary,
}

// POST /api/bookings
async fn book_seats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookingResponse>, BookingError> {
    let (receipt, summary) = state.booking.book_selected().await?;

    Ok(Json(BookingResponse {
        success: true,
        receipt,
        summary,
    }))
}

/* ---------- RESET ---------- */

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub summary: SelectionSummary,
}

// POST /api/reset - wipes bookings and the stored snapshot
async fn reset_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ResetResponse>, BookingError> {
    tracing::warn!("RESET: clearing all seats and the stored snapshot");
    let summary = state.booking.reset().await?;

    Ok(Json(ResetResponse {
        success: true,
        summary,
    }))
}
