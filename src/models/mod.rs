pub mod grid;
pub mod pricing;
pub mod seat;
pub mod snapshot;

pub use grid::Grid;
pub use pricing::{PriceTier, TierLegend};
pub use seat::{row_label, Seat, SeatStatus};
pub use snapshot::{SeatRecord, SnapshotError};
