//! Batch conversion coordinator.
//!
//! Fans conversions out over a tokio `JoinSet`, one task per record, and
//! collects every outcome before the batch completes. Record status only moves
//! forward (see [`RecordStatus::can_advance_to`]).

mod coordinator;
mod state;

pub use coordinator::{BatchCoordinator, BatchReport, RecordOutcome};
pub use state::{BatchState, RecordStatus, StatusError};
