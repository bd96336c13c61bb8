//! Row gap rule.
//!
//! A row is valid when its occupied seats (Selected or Booked) form one
//! contiguous run: no Available seat may sit between two occupied seats,
//! however wide the hole is and whatever mix of Selected/Booked flanks it.

use crate::models::SeatStatus;

/// First pair of consecutive occupied columns with free seats between them.
pub fn find_gap<I>(statuses: I) -> Option<(usize, usize)>
where
    I: IntoIterator<Item = SeatStatus>,
{
    let mut previous: Option<usize> = None;
    for (index, status) in statuses.into_iter().enumerate() {
        if !status.is_occupied() {
            continue;
        }
        if let Some(prev) = previous {
            if index - prev > 1 {
                return Some((prev, index));
            }
        }
        previous = Some(index);
    }
    None
}

pub fn is_valid_gap_state<I>(statuses: I) -> bool
where
    I: IntoIterator<Item = SeatStatus>,
{
    find_gap(statuses).is_none()
}
