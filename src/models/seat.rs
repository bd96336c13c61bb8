use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
}

impl SeatStatus {
    /// Selected and Booked seats both count as occupied for the gap rule.
    pub fn is_occupied(self) -> bool {
        matches!(self, SeatStatus::Selected | SeatStatus::Booked)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Selected => "selected",
            SeatStatus::Booked => "booked",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single seat. Position is fixed at creation, only the status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    row: usize,
    seat: usize,
    status: SeatStatus,
}

impl Seat {
    pub(crate) fn new(row: usize, seat: usize, status: SeatStatus) -> Self {
        Self { row, seat, status }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// Zero-based column inside the row.
    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn status(&self) -> SeatStatus {
        self.status
    }

    /// Stable identifier, `"<row>-<col>"`.
    pub fn id(&self) -> String {
        seat_id(self.row, self.seat)
    }

    /// Number printed on the seat, starting from 1.
    pub fn number(&self) -> usize {
        self.seat + 1
    }

    /// Human readable label such as `C7`.
    pub fn label(&self) -> String {
        format!("{}{}", row_label(self.row), self.number())
    }

    pub(crate) fn set_status(&mut self, status: SeatStatus) {
        self.status = status;
    }
}

pub fn seat_id(row: usize, seat: usize) -> String {
    format!("{}-{}", row, seat)
}

/// Letter label for a row: 0 -> "A", 25 -> "Z", 26 -> "AA".
pub fn row_label(row: usize) -> String {
    let mut letters = Vec::new();
    let mut n = row + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
