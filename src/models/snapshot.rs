//! Persisted form of the grid.
//!
//! A snapshot is a JSON array of rows, each an array of
//! `{"id": "<row>-<col>", "row": n, "seat": n, "status": "available|selected|booked"}`.
//! There is no version field, so loading checks the shape against the
//! configured venue instead.

use crate::config::GridConfig;
use crate::models::grid::Grid;
use crate::models::seat::{seat_id, Seat, SeatStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot does not match the configured grid: {0}")]
    Shape(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub id: String,
    pub row: usize,
    pub seat: usize,
    pub status: SeatStatus,
}

impl From<&Seat> for SeatRecord {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id(),
            row: seat.row(),
            seat: seat.seat(),
            status: seat.status(),
        }
    }
}

impl Grid {
    pub fn to_records(&self) -> Vec<Vec<SeatRecord>> {
        self.rows()
            .map(|row| row.iter().map(SeatRecord::from).collect())
            .collect()
    }

    pub fn to_snapshot(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&self.to_records())?)
    }

    /// Parses a snapshot and checks every record sits where its
    /// coordinates say it does.
    pub fn from_snapshot(blob: &str, config: &GridConfig) -> Result<Grid, SnapshotError> {
        let records: Vec<Vec<SeatRecord>> = serde_json::from_str(blob)?;

        if records.len() != config.rows {
            return Err(SnapshotError::Shape(format!(
                "expected {} rows, found {}",
                config.rows,
                records.len()
            )));
        }

        let mut rows = Vec::with_capacity(records.len());
        for (row_index, row) in records.into_iter().enumerate() {
            if row.len() != config.seats_per_row {
                return Err(SnapshotError::Shape(format!(
                    "row {} has {} seats, expected {}",
                    row_index,
                    row.len(),
                    config.seats_per_row
                )));
            }

            let mut seats = Vec::with_capacity(row.len());
            for (seat_index, record) in row.into_iter().enumerate() {
                let expected_id = seat_id(row_index, seat_index);
                if record.row != row_index || record.seat != seat_index || record.id != expected_id {
                    return Err(SnapshotError::Shape(format!(
                        "record {:?} found at position {}",
                        record.id, expected_id
                    )));
                }
                seats.push(Seat::new(row_index, seat_index, record.status));
            }
            rows.push(seats);
        }

        Ok(Grid::from_rows(rows))
    }
}
