//! Per-batch status tracking.

use std::collections::BTreeMap;
use std::fmt;

use crate::record::FileRecord;

/// Lifecycle of one record. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Pending,
    Reading,
    Read,
    Converting,
    Completed,
    Failed,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Reading => "reading",
            RecordStatus::Read => "read",
            RecordStatus::Converting => "converting",
            RecordStatus::Completed => "completed",
            RecordStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RecordStatus::Completed | RecordStatus::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            RecordStatus::Pending => 0,
            RecordStatus::Reading => 1,
            RecordStatus::Read => 2,
            RecordStatus::Converting => 3,
            RecordStatus::Completed | RecordStatus::Failed => 4,
        }
    }

    /// Forward moves only; `Completed` is reachable from `Converting` alone,
    /// `Failed` from any non-terminal status.
    pub fn can_advance_to(self, next: RecordStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            RecordStatus::Completed => self == RecordStatus::Converting,
            RecordStatus::Failed => true,
            _ => next.rank() > self.rank(),
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("record {0} is not part of this batch")]
    UnknownRecord(usize),
    #[error("record {index}: cannot move from {from} to {to}")]
    Regression {
        index: usize,
        from: RecordStatus,
        to: RecordStatus,
    },
}

/// Status of every record in one batch plus the terminal count.
#[derive(Debug, Clone, Default)]
pub struct BatchState {
    statuses: BTreeMap<usize, RecordStatus>,
    processed: usize,
}

impl BatchState {
    /// `total` records at indices `0..total`, all pending.
    pub fn new(total: usize) -> Self {
        Self {
            statuses: (0..total).map(|i| (i, RecordStatus::Pending)).collect(),
            processed: 0,
        }
    }

    /// State for records that are already in memory (status `read`).
    pub fn for_records(records: &[FileRecord]) -> Self {
        Self {
            statuses: records.iter().map(|r| (r.index(), RecordStatus::Read)).collect(),
            processed: 0,
        }
    }

    pub fn total_count(&self) -> usize {
        self.statuses.len()
    }

    /// Records that reached `completed` or `failed`. Never decreases.
    pub fn processed_count(&self) -> usize {
        self.processed
    }

    pub fn is_done(&self) -> bool {
        self.processed == self.statuses.len()
    }

    pub fn status(&self, index: usize) -> Option<RecordStatus> {
        self.statuses.get(&index).copied()
    }

    pub fn statuses(&self) -> impl Iterator<Item = (usize, RecordStatus)> + '_ {
        self.statuses.iter().map(|(i, s)| (*i, *s))
    }

    pub fn count(&self, status: RecordStatus) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }

    /// Indices that have not reached a terminal status.
    pub fn unfinished(&self) -> Vec<usize> {
        self.statuses
            .iter()
            .filter(|(_, s)| !s.is_terminal())
            .map(|(i, _)| *i)
            .collect()
    }

    /// Moves a record forward. A rejected transition leaves the state untouched.
    pub fn advance(&mut self, index: usize, next: RecordStatus) -> Result<(), StatusError> {
        let current = self
            .statuses
            .get_mut(&index)
            .ok_or(StatusError::UnknownRecord(index))?;
        if !current.can_advance_to(next) {
            return Err(StatusError::Regression {
                index,
                from: *current,
                to: next,
            });
        }
        *current = next;
        if next.is_terminal() {
            self.processed += 1;
        }
        Ok(())
    }
}
