use std::collections::{BTreeMap, BTreeSet};
use tokio::task::JoinSet;

use super::state::{BatchState, RecordStatus};
use crate::convert::{ConversionRequest, ConversionResult, ConversionService, ResizeOptions};
use crate::error::ConvertError;
use crate::events::BatchEvents;
use crate::format::TargetFormat;
use crate::record::FileRecord;

/// Final per-record outcome, keyed by record index.
pub type RecordOutcome = Result<ConversionResult, ConvertError>;

/// Everything a finished batch produced.
#[derive(Debug)]
pub struct BatchReport {
    pub state: BatchState,
    pub outcomes: BTreeMap<usize, RecordOutcome>,
}

impl BatchReport {
    pub fn completed(&self) -> impl Iterator<Item = (usize, &ConversionResult)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|(i, o)| o.as_ref().ok().map(|r| (*i, r)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (usize, &ConvertError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|(i, o)| o.as_ref().err().map(|e| (*i, e)))
    }

    pub fn completed_count(&self) -> usize {
        self.completed().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Drives one conversion per record, concurrently, and reports every state
/// change to the event sink.
pub struct BatchCoordinator<'a, E: ?Sized> {
    service: &'a ConversionService,
    events: &'a E,
}

impl<'a, E> BatchCoordinator<'a, E>
where
    E: BatchEvents + ?Sized,
{
    pub fn new(service: &'a ConversionService, events: &'a E) -> Self {
        Self { service, events }
    }

    /// Converts in-memory records with a fresh state.
    pub async fn convert_records(
        &self,
        records: Vec<FileRecord>,
        format: TargetFormat,
        resize: Option<ResizeOptions>,
    ) -> BatchReport {
        let state = BatchState::for_records(&records);
        self.convert_batch(state, records, format, resize).await
    }

    /// Converts every record and waits for all of them (gather-all; one
    /// failure never cancels the rest). Every index in `state` ends terminal:
    /// an index with no matching record, or whose task died, is failed.
    /// `on_batch_complete` fires exactly once, also for an empty batch.
    pub async fn convert_batch(
        &self,
        mut state: BatchState,
        records: Vec<FileRecord>,
        format: TargetFormat,
        resize: Option<ResizeOptions>,
    ) -> BatchReport {
        let mut outcomes = BTreeMap::new();
        let mut in_flight = BTreeSet::new();
        let mut join_set = JoinSet::new();

        for record in records {
            let index = record.index();
            if let Err(e) = state.advance(index, RecordStatus::Converting) {
                tracing::warn!(index, error = %e, "skipping record");
                continue;
            }
            self.events.on_conversion_start(index, format);
            in_flight.insert(index);
            let service = self.service.clone();
            let request = ConversionRequest::new(record, format, resize);
            join_set.spawn(async move { (index, service.convert(request).await) });
        }

        while let Some(joined) = join_set.join_next().await {
            let (index, result) = match joined {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!("conversion task join: {}", e);
                    continue;
                }
            };
            in_flight.remove(&index);
            self.finish(&mut state, &mut outcomes, index, result, format, resize.as_ref());
        }

        for index in state.unfinished() {
            let reason = if in_flight.contains(&index) {
                "conversion task aborted"
            } else {
                "no record supplied for conversion"
            };
            self.finish(
                &mut state,
                &mut outcomes,
                index,
                Err(ConvertError::conversion(reason)),
                format,
                resize.as_ref(),
            );
        }

        tracing::info!(
            total = state.total_count(),
            completed = state.count(RecordStatus::Completed),
            failed = state.count(RecordStatus::Failed),
            "batch finished"
        );
        self.events.on_batch_complete();
        BatchReport { state, outcomes }
    }

    fn finish(
        &self,
        state: &mut BatchState,
        outcomes: &mut BTreeMap<usize, RecordOutcome>,
        index: usize,
        result: RecordOutcome,
        format: TargetFormat,
        resize: Option<&ResizeOptions>,
    ) {
        let next = if result.is_ok() {
            RecordStatus::Completed
        } else {
            RecordStatus::Failed
        };
        if let Err(e) = state.advance(index, next) {
            tracing::error!(index, error = %e, "dropping conversion outcome");
            return;
        }
        match &result {
            Ok(r) => self.events.on_conversion_complete(index, r, format, resize),
            Err(e) => self.events.on_conversion_failed(index, e),
        }
        outcomes.insert(index, result);
    }
}
