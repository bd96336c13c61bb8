use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{delete, get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::engine::{SeatGridEngine, SelectionSummary, ToggleOutcome};
use crate::error::BookingError;
use crate::models::{PriceTier, Seat, SeatStatus, TierLegend};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats", get(get_seats))
        .route("/seats/summary", get(get_summary))
        .route("/seats/toggle", patch(toggle_seat))
        .route("/seats/selection", delete(clear_selection))
        .route("/pricing", get(get_pricing))
}

/* ---------- views ---------- */

#[derive(Debug, Serialize)]
pub struct SeatResponse {
    pub id: String,
    pub row: usize,
    pub seat: usize,
    pub number: usize,
    pub label: String,
    pub status: SeatStatus,
}

impl From<&Seat> for SeatResponse {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id(),
            row: seat.row(),
            seat: seat.seat(),
            number: seat.number(),
            label: seat.label(),
            status: seat.status(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RowResponse {
    pub index: usize,
    pub label: String,
    pub tier: PriceTier,
    pub price: u32,
    pub seats: Vec<SeatResponse>,
}

#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub rows: Vec<RowResponse>,
    pub summary: SelectionSummary,
}

impl GridResponse {
    fn from_engine(engine: &SeatGridEngine) -> Self {
        let rows = engine
            .grid()
            .rows()
            .enumerate()
            .map(|(index, seats)| RowResponse {
                index,
                label: engine.row_label(index),
                tier: engine.tier_of(index),
                price: engine.price_of(index),
                seats: seats.iter().map(SeatResponse::from).collect(),
            })
            .collect();

        Self {
            rows,
            summary: engine.summary(),
        }
    }
}

/* ---------- SEATS ---------- */

// GET /api/seats
async fn get_seats(State(state): State<Arc<AppState>>) -> Json<GridResponse> {
    Json(state.booking.with_engine(GridResponse::from_engine).await)
}

// GET /api/seats/summary
async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SelectionSummary> {
    Json(state.booking.summary().await)
}

// PATCH /api/seats/toggle
#[derive(Debug, Deserialize)]
pub struct ToggleSeatRequest {
    pub row: usize,
    pub seat: usize,
}

#[derive(Debug, Serialize)]
pub struct ToggleSeatResponse {
    pub outcome: ToggleOutcome,
    pub seat: SeatResponse,
    pub summary: SelectionSummary,
}

async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ToggleSeatRequest>, JsonRejection>,
) -> Result<Json<ToggleSeatResponse>, BookingError> {
    let Json(req) = payload?;
    let change = state.booking.toggle_seat(req.row, req.seat).await?;

    Ok(Json(ToggleSeatResponse {
        outcome: change.outcome,
        seat: SeatResponse::from(&change.seat),
        summary: change.summary,
    }))
}

// DELETE /api/seats/selection
#[derive(Debug, Serialize)]
pub struct ClearSelectionResponse {
    pub released: usize,
    pub summary: SelectionSummary,
}

async fn clear_selection(State(state): State<Arc<AppState>>) -> Json<ClearSelectionResponse> {
    let (released, summary) = state.booking.clear_selection().await;
    Json(ClearSelectionResponse { released, summary })
}

/* ---------- PRICING ---------- */

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pub tiers: Vec<TierLegend>,
}

// GET /api/pricing
async fn get_pricing(State(state): State<Arc<AppState>>) -> Json<PricingResponse> {
    let rules = &state.config.booking;
    Json(PricingResponse {
        tiers: rules.pricing.legend(rules.grid.rows),
    })
}
