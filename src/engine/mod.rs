//! Seat grid engine.
//!
//! Owns the seat matrix and is the only place seat statuses change. All
//! aggregates (counts, total price) are recomputed from the grid on every
//! query, so they cannot drift from it. Mutations either apply completely or
//! leave the grid untouched.
//!
//! The engine is synchronous and does no I/O. Persisting snapshots is the
//! caller's job, see [`crate::services::booking::BookingService`].

pub mod gap;

use crate::config::BookingRules;
use crate::error::BookingError;
use crate::models::{row_label, Grid, PriceTier, Seat, SeatStatus, SnapshotError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What a toggle did to the seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Selected,
    Released,
    /// Seat is booked, nothing changed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub available: usize,
    pub selected: usize,
    pub booked: usize,
    pub total_price: u64,
    pub max_seats: usize,
    pub selected_seats: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingReceipt {
    pub reference: Uuid,
    pub booked_at: DateTime<Utc>,
    pub seats: Vec<String>,
    pub seat_count: usize,
    pub total_price: u64,
}

pub struct SeatGridEngine {
    rules: BookingRules,
    grid: Grid,
}

impl SeatGridEngine {
    pub fn new(rules: BookingRules) -> Self {
        let grid = Grid::fresh(&rules.grid);
        Self { rules, grid }
    }

    /// Restores the grid from a persisted snapshot. A snapshot that is
    /// missing, unreadable or shaped for a different venue yields a fresh
    /// grid. Selections never survive a restart.
    pub fn restore(rules: BookingRules, snapshot: Option<&str>) -> Self {
        let Some(blob) = snapshot else {
            info!("No seat snapshot found, starting with a fresh grid");
            return Self::new(rules);
        };

        match Grid::from_snapshot(blob, &rules.grid) {
            Ok(mut grid) => {
                let released = grid.transition_all(SeatStatus::Selected, SeatStatus::Available);
                if released > 0 {
                    warn!(released, "Snapshot contained selected seats, released them");
                }
                info!(
                    booked = grid.count(SeatStatus::Booked),
                    "Restored seat grid from snapshot"
                );
                Self { rules, grid }
            }
            Err(e) => {
                warn!(error = %e, "Discarding seat snapshot, starting with a fresh grid");
                Self::new(rules)
            }
        }
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    // === Queries ===

    pub fn available_count(&self) -> usize {
        self.grid.count(SeatStatus::Available)
    }

    pub fn selected_count(&self) -> usize {
        self.grid.count(SeatStatus::Selected)
    }

    pub fn booked_count(&self) -> usize {
        self.grid.count(SeatStatus::Booked)
    }

    pub fn price_of(&self, row: usize) -> u32 {
        self.rules.pricing.price_of(row)
    }

    pub fn tier_of(&self, row: usize) -> PriceTier {
        self.rules.pricing.tier_of(row)
    }

    pub fn row_label(&self, row: usize) -> String {
        row_label(row)
    }

    pub fn selected_seats(&self) -> impl Iterator<Item = &Seat> + '_ {
        self.grid
            .seats()
            .filter(|seat| seat.status() == SeatStatus::Selected)
    }

    /// Priced per selected seat, by that seat's row.
    pub fn total_price(&self) -> u64 {
        self.selected_seats()
            .map(|seat| u64::from(self.price_of(seat.row())))
            .sum()
    }

    /// Rows outside the grid have no seats and are trivially valid.
    pub fn is_valid_gap_state(&self, row: usize) -> bool {
        self.grid
            .row(row)
            .map_or(true, |seats| gap::is_valid_gap_state(seats.iter().map(Seat::status)))
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            available: self.available_count(),
            selected: self.selected_count(),
            booked: self.booked_count(),
            total_price: self.total_price(),
            max_seats: self.rules.max_seats_per_booking,
            selected_seats: self.selected_seats().map(Seat::id).collect(),
        }
    }

    pub fn snapshot(&self) -> Result<String, SnapshotError> {
        self.grid.to_snapshot()
    }

    // === Mutations ===

    /// Flips a seat between Available and Selected. The candidate row is
    /// validated before anything is written.
    pub fn toggle_seat(&mut self, row: usize, col: usize) -> Result<ToggleOutcome, BookingError> {
        let seats = self
            .grid
            .row(row)
            .ok_or(BookingError::SeatNotFound { row, seat: col })?;
        let current = seats
            .get(col)
            .ok_or(BookingError::SeatNotFound { row, seat: col })?
            .status();

        let (next, outcome) = match current {
            SeatStatus::Booked => {
                debug!(row, seat = col, "Ignoring toggle on booked seat");
                return Ok(ToggleOutcome::Ignored);
            }
            SeatStatus::Available => {
                let max = self.rules.max_seats_per_booking;
                if self.selected_count() >= max {
                    return Err(BookingError::CapacityExceeded { max });
                }
                (SeatStatus::Selected, ToggleOutcome::Selected)
            }
            SeatStatus::Selected => (SeatStatus::Available, ToggleOutcome::Released),
        };

        let candidate = seats
            .iter()
            .enumerate()
            .map(|(index, seat)| if index == col { next } else { seat.status() });
        if let Some((left, right)) = gap::find_gap(candidate) {
            debug!(row, seat = col, left, right, "Toggle rejected by gap rule");
            return Err(BookingError::GapViolation { row, seat: col });
        }

        if let Some(seat) = self.grid.seat_mut(row, col) {
            seat.set_status(next);
        }
        debug!(row, seat = col, status = %next, "Seat toggled");
        Ok(outcome)
    }

    /// Turns every selected seat into a booked one. The gap rule already
    /// holds for each row, so nothing is re-validated here.
    pub fn book_selected(&mut self) -> Result<BookingReceipt, BookingError> {
        let seats: Vec<String> = self.selected_seats().map(Seat::id).collect();
        if seats.is_empty() {
            return Err(BookingError::NothingSelected);
        }
        let total_price = self.total_price();

        let seat_count = self
            .grid
            .transition_all(SeatStatus::Selected, SeatStatus::Booked);

        Ok(BookingReceipt {
            reference: Uuid::new_v4(),
            booked_at: Utc::now(),
            seats,
            seat_count,
            total_price,
        })
    }

    /// Returns how many seats were released.
    pub fn clear_selection(&mut self) -> usize {
        self.grid
            .transition_all(SeatStatus::Selected, SeatStatus::Available)
    }

    pub fn reset(&mut self) {
        self.grid = Grid::fresh(&self.rules.grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use proptest::prelude::*;
    use serde_json::json;

    fn engine() -> SeatGridEngine {
        SeatGridEngine::new(BookingRules::default())
    }

    fn status(engine: &SeatGridEngine, row: usize, col: usize) -> SeatStatus {
        engine.grid().seat(row, col).map(Seat::status).unwrap()
    }

    fn row_statuses(engine: &SeatGridEngine, row: usize) -> Vec<SeatStatus> {
        engine.grid().row(row).unwrap().iter().map(Seat::status).collect()
    }

    #[test]
    fn fresh_grid_is_all_available() {
        let engine = engine();

        assert_eq!(engine.available_count(), 80);
        assert_eq!(engine.selected_count(), 0);
        assert_eq!(engine.booked_count(), 0);
        assert_eq!(engine.total_price(), 0);
    }

    #[test]
    fn toggle_twice_restores_seat() {
        let mut engine = engine();

        assert_eq!(engine.toggle_seat(4, 4).unwrap(), ToggleOutcome::Selected);
        assert_eq!(engine.selected_count(), 1);
        assert_eq!(engine.toggle_seat(4, 4).unwrap(), ToggleOutcome::Released);

        assert_eq!(status(&engine, 4, 4), SeatStatus::Available);
        assert_eq!(engine.available_count(), 80);
        assert_eq!(engine.selected_count(), 0);
    }

    #[test]
    fn ninth_selection_exceeds_capacity() {
        let mut engine = engine();
        for col in 0..8 {
            engine.toggle_seat(7, col).unwrap();
        }

        let err = engine.toggle_seat(7, 8).unwrap_err();

        assert!(matches!(err, BookingError::CapacityExceeded { max: 8 }));
        assert_eq!(engine.selected_count(), 8);
        assert_eq!(status(&engine, 7, 8), SeatStatus::Available);
    }

    #[test]
    fn deselecting_at_capacity_is_allowed() {
        let mut engine = engine();
        for col in 0..8 {
            engine.toggle_seat(0, col).unwrap();
        }

        assert_eq!(engine.toggle_seat(0, 7).unwrap(), ToggleOutcome::Released);
        assert_eq!(engine.selected_count(), 7);
    }

    #[test]
    fn gap_of_one_seat_is_rejected() {
        let mut engine = engine();
        engine.toggle_seat(0, 0).unwrap();

        let err = engine.toggle_seat(0, 2).unwrap_err();

        assert!(matches!(err, BookingError::GapViolation { row: 0, seat: 2 }));
        let mut expected = vec![SeatStatus::Available; 10];
        expected[0] = SeatStatus::Selected;
        assert_eq!(row_statuses(&engine, 0), expected);
    }

    #[test]
    fn wide_gap_is_rejected() {
        let mut engine = engine();
        engine.toggle_seat(1, 0).unwrap();

        assert!(matches!(
            engine.toggle_seat(1, 9),
            Err(BookingError::GapViolation { .. })
        ));
        assert_eq!(engine.selected_count(), 1);
    }

    #[test]
    fn adjacent_selection_is_accepted() {
        let mut engine = engine();

        engine.toggle_seat(0, 0).unwrap();
        engine.toggle_seat(0, 1).unwrap();

        assert_eq!(engine.selected_count(), 2);
        assert!(engine.is_valid_gap_state(0));
    }

    #[test]
    fn releasing_middle_of_run_is_rejected() {
        let mut engine = engine();
        for col in 3..6 {
            engine.toggle_seat(2, col).unwrap();
        }

        let err = engine.toggle_seat(2, 4).unwrap_err();

        assert!(matches!(err, BookingError::GapViolation { row: 2, seat: 4 }));
        assert_eq!(status(&engine, 2, 4), SeatStatus::Selected);
        assert_eq!(engine.selected_count(), 3);
    }

    #[test]
    fn releasing_end_of_run_is_accepted() {
        let mut engine = engine();
        for col in 3..6 {
            engine.toggle_seat(2, col).unwrap();
        }

        assert_eq!(engine.toggle_seat(2, 5).unwrap(), ToggleOutcome::Released);
        assert_eq!(engine.toggle_seat(2, 3).unwrap(), ToggleOutcome::Released);
        assert_eq!(engine.selected_count(), 1);
    }

    #[test]
    fn gap_rule_spans_booked_and_selected_seats() {
        let mut engine = engine();
        engine.toggle_seat(3, 2).unwrap();
        engine.book_selected().unwrap();

        assert!(matches!(
            engine.toggle_seat(3, 4),
            Err(BookingError::GapViolation { .. })
        ));
        assert_eq!(engine.toggle_seat(3, 3).unwrap(), ToggleOutcome::Selected);
        assert_eq!(engine.toggle_seat(3, 1).unwrap(), ToggleOutcome::Selected);
    }

    #[test]
    fn other_rows_do_not_affect_toggle() {
        let mut engine = engine();
        engine.toggle_seat(0, 0).unwrap();

        assert_eq!(engine.toggle_seat(1, 5).unwrap(), ToggleOutcome::Selected);
    }

    #[test]
    fn booked_seat_toggle_is_noop() {
        let mut engine = engine();
        engine.toggle_seat(5, 5).unwrap();
        engine.book_selected().unwrap();
        let before = engine.summary();

        assert_eq!(engine.toggle_seat(5, 5).unwrap(), ToggleOutcome::Ignored);

        assert_eq!(status(&engine, 5, 5), SeatStatus::Booked);
        assert_eq!(engine.summary(), before);
    }

    #[test]
    fn unknown_seat_is_reported() {
        let mut engine = engine();

        assert!(matches!(
            engine.toggle_seat(8, 0),
            Err(BookingError::SeatNotFound { row: 8, seat: 0 })
        ));
        assert!(matches!(
            engine.toggle_seat(0, 10),
            Err(BookingError::SeatNotFound { row: 0, seat: 10 })
        ));
        assert!(engine.is_valid_gap_state(99));
    }

    #[test]
    fn booking_moves_selection_to_booked() {
        let mut engine = engine();
        engine.toggle_seat(0, 0).unwrap();
        engine.toggle_seat(0, 1).unwrap();
        assert_eq!(engine.total_price(), 2000);

        let receipt = engine.book_selected().unwrap();

        assert_eq!(receipt.seats, vec!["0-0".to_string(), "0-1".to_string()]);
        assert_eq!(receipt.seat_count, 2);
        assert_eq!(receipt.total_price, 2000);
        assert_eq!(engine.selected_count(), 0);
        assert_eq!(engine.booked_count(), 2);
        assert_eq!(engine.total_price(), 0);
        assert_eq!(status(&engine, 0, 0), SeatStatus::Booked);
        assert_eq!(status(&engine, 0, 1), SeatStatus::Booked);
    }

    #[test]
    fn booking_nothing_is_rejected() {
        let mut engine = engine();

        assert!(matches!(
            engine.book_selected(),
            Err(BookingError::NothingSelected)
        ));
        assert_eq!(engine.booked_count(), 0);
    }

    #[test]
    fn total_price_is_per_seat_by_row() {
        let mut engine = engine();
        engine.toggle_seat(0, 0).unwrap();
        engine.toggle_seat(4, 0).unwrap();
        engine.toggle_seat(4, 1).unwrap();
        engine.toggle_seat(7, 9).unwrap();

        assert_eq!(engine.total_price(), 1000 + 750 * 2 + 500);
    }

    #[test]
    fn clear_selection_keeps_bookings() {
        let mut engine = engine();
        engine.toggle_seat(0, 0).unwrap();
        engine.book_selected().unwrap();
        engine.toggle_seat(0, 1).unwrap();
        engine.toggle_seat(6, 3).unwrap();

        assert_eq!(engine.clear_selection(), 2);

        assert_eq!(engine.selected_count(), 0);
        assert_eq!(engine.booked_count(), 1);
        assert_eq!(engine.available_count(), 79);
        assert_eq!(engine.clear_selection(), 0);
    }

    #[test]
    fn reset_matches_fresh_engine() {
        let mut engine = engine();
        engine.toggle_seat(0, 0).unwrap();
        engine.book_selected().unwrap();
        engine.toggle_seat(3, 3).unwrap();

        engine.reset();

        assert_eq!(engine.grid(), SeatGridEngine::new(BookingRules::default()).grid());
        assert_eq!(engine.available_count(), 80);
    }

    #[test]
    fn summary_lists_selected_seats_in_order() {
        let mut engine = engine();
        engine.toggle_seat(2, 1).unwrap();
        engine.toggle_seat(0, 9).unwrap();

        let summary = engine.summary();

        assert_eq!(summary.selected_seats, vec!["0-9".to_string(), "2-1".to_string()]);
        assert_eq!(summary.total_price, 2000);
        assert_eq!(summary.max_seats, 8);
        assert_eq!(summary.available, 78);
    }

    #[test]
    fn restore_keeps_bookings_and_drops_selection() {
        let rules = BookingRules {
            grid: GridConfig {
                rows: 1,
                seats_per_row: 3,
            },
            ..BookingRules::default()
        };
        let blob = json!([[
            {"id": "0-0", "row": 0, "seat": 0, "status": "booked"},
            {"id": "0-1", "row": 0, "seat": 1, "status": "selected"},
            {"id": "0-2", "row": 0, "seat": 2, "status": "available"}
        ]])
        .to_string();

        let engine = SeatGridEngine::restore(rules, Some(&blob));

        assert_eq!(engine.booked_count(), 1);
        assert_eq!(engine.selected_count(), 0);
        assert_eq!(engine.available_count(), 2);
    }

    #[test]
    fn restored_gap_row_only_accepts_filling_the_hole() {
        let rules = BookingRules {
            grid: GridConfig {
                rows: 1,
                seats_per_row: 4,
            },
            ..BookingRules::default()
        };
        let blob = json!([[
            {"id": "0-0", "row": 0, "seat": 0, "status": "booked"},
            {"id": "0-1", "row": 0, "seat": 1, "status": "selected"},
            {"id": "0-2", "row": 0, "seat": 2, "status": "booked"},
            {"id": "0-3", "row": 0, "seat": 3, "status": "available"}
        ]])
        .to_string();

        let mut engine = SeatGridEngine::restore(rules, Some(&blob));

        assert_eq!(
            row_statuses(&engine, 0),
            vec![
                SeatStatus::Booked,
                SeatStatus::Available,
                SeatStatus::Booked,
                SeatStatus::Available
            ]
        );
        assert!(!engine.is_valid_gap_state(0));
        assert!(matches!(
            engine.toggle_seat(0, 3),
            Err(BookingError::GapViolation { row: 0, seat: 3 })
        ));
        assert_eq!(status(&engine, 0, 3), SeatStatus::Available);

        assert_eq!(engine.toggle_seat(0, 1).unwrap(), ToggleOutcome::Selected);
        assert!(engine.is_valid_gap_state(0));
        assert_eq!(engine.toggle_seat(0, 3).unwrap(), ToggleOutcome::Selected);
    }

    #[test]
    fn restore_falls_back_to_fresh_grid() {
        let rules = BookingRules::default();
        let other_venue = SeatGridEngine::new(BookingRules {
            grid: GridConfig {
                rows: 2,
                seats_per_row: 2,
            },
            ..BookingRules::default()
        })
        .snapshot()
        .unwrap();

        for blob in [None, Some("{broken"), Some(other_venue.as_str())] {
            let engine = SeatGridEngine::restore(rules.clone(), blob);
            assert_eq!(engine.available_count(), 80);
        }
    }

    #[test]
    fn snapshot_round_trips_bookings() {
        let mut engine = engine();
        engine.toggle_seat(0, 0).unwrap();
        engine.toggle_seat(0, 1).unwrap();
        engine.book_selected().unwrap();

        let restored = SeatGridEngine::restore(BookingRules::default(), Some(&engine.snapshot().unwrap()));

        assert_eq!(restored.grid(), engine.grid());
    }

    proptest! {
        #[test]
        fn random_toggles_keep_invariants(
            clicks in prop::collection::vec((0usize..8, 0usize..10, any::<bool>()), 0..120)
        ) {
            let mut engine = engine();
            for (row, col, book) in clicks {
                let before = engine.grid().clone();
                match engine.toggle_seat(row, col) {
                    Ok(_) => {}
                    Err(_) => prop_assert_eq!(engine.grid(), &before),
                }
                if book && engine.selected_count() > 0 && row % 3 == 0 {
                    engine.book_selected().unwrap();
                }

                prop_assert!(engine.selected_count() <= 8);
                prop_assert_eq!(
                    engine.available_count() + engine.selected_count() + engine.booked_count(),
                    80
                );
                for r in 0..8 {
                    prop_assert!(engine.is_valid_gap_state(r));
                }
            }
        }
    }
}
