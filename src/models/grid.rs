use crate::config::GridConfig;
use crate::models::seat::{Seat, SeatStatus};

/// Rectangular seat matrix, rows in venue order, seats in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Seat>>,
}

impl Grid {
    /// Every seat Available.
    pub fn fresh(config: &GridConfig) -> Self {
        let rows = (0..config.rows)
            .map(|row| {
                (0..config.seats_per_row)
                    .map(|seat| Seat::new(row, seat, SeatStatus::Available))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub(crate) fn from_rows(rows: Vec<Vec<Seat>>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Seat]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn row(&self, row: usize) -> Option<&[Seat]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn seat(&self, row: usize, seat: usize) -> Option<&Seat> {
        self.rows.get(row).and_then(|r| r.get(seat))
    }

    /// All seats in row-major order.
    pub fn seats(&self) -> impl Iterator<Item = &Seat> + '_ {
        self.rows.iter().flatten()
    }

    pub fn count(&self, status: SeatStatus) -> usize {
        self.seats().filter(|s| s.status() == status).count()
    }

    pub(crate) fn seat_mut(&mut self, row: usize, seat: usize) -> Option<&mut Seat> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(seat))
    }

    /// Moves every seat in `from` to `to`, returns how many changed.
    pub(crate) fn transition_all(&mut self, from: SeatStatus, to: SeatStatus) -> usize {
        let mut changed = 0;
        for seat in self.rows.iter_mut().flatten() {
            if seat.status() == from {
                seat.set_status(to);
                changed += 1;
            }
        }
        changed
    }
}
