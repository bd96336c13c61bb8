use crate::models::SnapshotError;
use crate::store::StoreError;
use thiserror::Error;

/// Reasons a booking intent is rejected. None of them are fatal: the grid
/// is left as it was, except for `Persistence` where the in-memory change
/// stands but was not written to the store.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("You can only select up to {max} seats")]
    CapacityExceeded { max: usize },

    #[error("Invalid selection! Toggling seat {row}-{seat} would leave an empty seat between occupied seats")]
    GapViolation { row: usize, seat: usize },

    #[error("Please select at least one seat to book")]
    NothingSelected,

    #[error("Seat {row}-{seat} does not exist")]
    SeatNotFound { row: usize, seat: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Snapshot store failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("Could not encode seat snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl BookingError {
    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::CapacityExceeded { .. } => "capacity_exceeded",
            BookingError::GapViolation { .. } => "gap_violation",
            BookingError::NothingSelected => "nothing_selected",
            BookingError::SeatNotFound { .. } => "seat_not_found",
            BookingError::InvalidRequest(_) => "invalid_request",
            BookingError::Persistence(_) => "persistence_error",
            BookingError::Snapshot(_) => "snapshot_error",
        }
    }
}
