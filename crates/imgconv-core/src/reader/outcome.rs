//! Per-index result of reading one input.

use crate::error::ConvertError;
use crate::record::FileRecord;

/// Outcome of reading the input at `index`.
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub index: usize,
    /// Name of the input, kept even when the read failed.
    pub name: String,
    pub result: Result<FileRecord, ConvertError>,
}

impl ReadOutcome {
    pub(super) fn from_result(
        index: usize,
        name: &str,
        result: Result<std::sync::Arc<[u8]>, ConvertError>,
    ) -> Self {
        Self {
            index,
            name: name.to_string(),
            result: result.map(|bytes| FileRecord::new(index, name, bytes)),
        }
    }
}

/// Splits outcomes into readable records and per-index read failures.
pub fn split_outcomes(outcomes: Vec<ReadOutcome>) -> (Vec<FileRecord>, Vec<(usize, ConvertError)>) {
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(record) => records.push(record),
            Err(e) => failures.push((outcome.index, e)),
        }
    }
    (records, failures)
}
