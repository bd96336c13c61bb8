//! Booking service.
//!
//! Couples one [`SeatGridEngine`] with a [`SnapshotStore`]. Intents are
//! applied one at a time: the engine lock is held across the store write, so
//! a snapshot is never overtaken by an older one.
//!
//! Only booked seats are durable. Toggles and clearing the selection stay in
//! memory; booking writes the whole grid; reset removes the snapshot.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::BookingRules;
use crate::engine::{BookingReceipt, SeatGridEngine, SelectionSummary, ToggleOutcome};
use crate::error::BookingError;
use crate::models::Seat;
use crate::store::SnapshotStore;

/// Result of a seat click.
#[derive(Debug, Clone)]
pub struct SeatChange {
    pub outcome: ToggleOutcome,
    pub seat: Seat,
    pub summary: SelectionSummary,
}

pub struct BookingService {
    engine: Mutex<SeatGridEngine>,
    store: Arc<dyn SnapshotStore>,
    snapshot_key: String,
}

impl BookingService {
    /// Restores the grid from the store. A store that cannot be read fails
    /// the load: starting empty would let the next booking overwrite the
    /// stored bookings.
    pub async fn load(
        rules: BookingRules,
        store: Arc<dyn SnapshotStore>,
        snapshot_key: impl Into<String>,
    ) -> Result<Self, BookingError> {
        let snapshot_key = snapshot_key.into();
        let snapshot = store.load(&snapshot_key).await.map_err(|e| {
            error!(error = %e, key = %snapshot_key, "Failed to read seat snapshot");
            e
        })?;

        let engine = SeatGridEngine::restore(rules, snapshot.as_deref());
        Ok(Self {
            engine: Mutex::new(engine),
            store,
            snapshot_key,
        })
    }

    /// Read-only access to the engine for building views.
    pub async fn with_engine<R>(&self, f: impl FnOnce(&SeatGridEngine) -> R) -> R {
        let engine = self.engine.lock().await;
        f(&*engine)
    }

    pub async fn summary(&self) -> SelectionSummary {
        self.with_engine(SeatGridEngine::summary).await
    }

    pub async fn toggle_seat(&self, row: usize, seat: usize) -> Result<SeatChange, BookingError> {
        let mut engine = self.engine.lock().await;
        let outcome = engine.toggle_seat(row, seat)?;
        let seat = engine
            .grid()
            .seat(row, seat)
            .copied()
            .ok_or(BookingError::SeatNotFound { row, seat })?;

        Ok(SeatChange {
            outcome,
            seat,
            summary: engine.summary(),
        })
    }

    pub async fn clear_selection(&self) -> (usize, SelectionSummary) {
        let mut engine = self.engine.lock().await;
        let released = engine.clear_selection();
        if released > 0 {
            info!(released, "Selection cleared");
        }
        (released, engine.summary())
    }

    /// Books the selection and persists the grid. If the write fails the
    /// seats stay booked for this session and `Persistence` is returned.
    pub async fn book_selected(&self) -> Result<(BookingReceipt, SelectionSummary), BookingError> {
        let mut engine = self.engine.lock().await;
        let receipt = engine.book_selected()?;
        info!(
            reference = %receipt.reference,
            seats = receipt.seat_count,
            total_price = receipt.total_price,
            "Booking confirmed"
        );

        let snapshot = engine.snapshot()?;
        if let Err(e) = self.store.save(&self.snapshot_key, &snapshot).await {
            error!(
                error = %e,
                reference = %receipt.reference,
                "Booking kept in memory but the snapshot was not saved"
            );
            return Err(e.into());
        }

        Ok((receipt, engine.summary()))
    }

    /// Fresh grid in memory, snapshot removed from the store. The in-memory
    /// reset stands even if the store cannot be reached.
    pub async fn reset(&self) -> Result<SelectionSummary, BookingError> {
        let mut engine = self.engine.lock().await;
        engine.reset();

        if let Err(e) = self.store.remove(&self.snapshot_key).await {
            warn!(error = %e, "Grid reset but the stored snapshot could not be removed");
            return Err(e.into());
        }

        info!("Seat grid reset");
        Ok(engine.summary())
    }
}
