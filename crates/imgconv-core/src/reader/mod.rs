//! Batch file reader.
//!
//! Loads every input of a listing into a [`FileRecord`] concurrently. A failed
//! read is scoped to its own index: it is reported through the event sink and
//! returned as a failed [`ReadOutcome`] while the other reads continue. Only an
//! empty listing fails the whole call ([`EmptyBatch`]).

mod outcome;

use anyhow::Result;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::error::{ConvertError, EmptyBatch};
use crate::events::BatchEvents;
use crate::record::InputFile;

pub use outcome::{split_outcomes, ReadOutcome};

/// Reads all `inputs`, emitting `on_file_read` and `on_progress` in completion order.
/// The returned outcomes are sorted by index and cover every input.
pub async fn read_batch<E>(inputs: Vec<InputFile>, events: &E) -> Result<Vec<ReadOutcome>>
where
    E: BatchEvents + ?Sized,
{
    if inputs.is_empty() {
        return Err(anyhow::Error::new(EmptyBatch));
    }
    let total = inputs.len();
    let mut names = Vec::with_capacity(total);
    let mut join_set = JoinSet::new();
    for (index, input) in inputs.into_iter().enumerate() {
        names.push(input.name());
        join_set.spawn(async move { (index, read_one(input).await) });
    }

    let mut outcomes = Vec::with_capacity(total);
    let mut unfinished: BTreeSet<usize> = (0..total).collect();
    let mut processed = 0usize;
    while let Some(joined) = join_set.join_next().await {
        let (index, result) = match joined {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("read task join: {}", e);
                continue;
            }
        };
        unfinished.remove(&index);
        processed += 1;
        let outcome = ReadOutcome::from_result(index, &names[index], result);
        report(events, &outcome, processed, total);
        outcomes.push(outcome);
    }

    // Only reachable if a read task panicked; still give those indices a terminal outcome.
    for index in std::mem::take(&mut unfinished) {
        let outcome = ReadOutcome::from_result(
            index,
            &names[index],
            Err(ConvertError::read("read task aborted")),
        );
        processed += 1;
        report(events, &outcome, processed, total);
        outcomes.push(outcome);
    }

    outcomes.sort_by_key(|o| o.index);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    tracing::debug!(total, failed, "batch read finished");
    Ok(outcomes)
}

fn report<E>(events: &E, outcome: &ReadOutcome, processed: usize, total: usize)
where
    E: BatchEvents + ?Sized,
{
    events.on_file_read(outcome.index, outcome.result.as_ref().map(|_| ()));
    events.on_progress(processed, total);
}

async fn read_one(input: InputFile) -> Result<Arc<[u8]>, ConvertError> {
    match input {
        InputFile::Path(path) => tokio::fs::read(&path)
            .await
            .map(Arc::from)
            .map_err(|e| ConvertError::read(format!("{}: {}", path.display(), e))),
        InputFile::Memory { bytes, .. } => Ok(Arc::from(bytes)),
    }
}
