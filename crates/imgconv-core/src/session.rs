//! Read-then-convert pipeline for one batch.

use anyhow::Result;

use crate::batch::{BatchCoordinator, BatchReport, BatchState, RecordStatus};
use crate::convert::{ConversionService, ResizeOptions};
use crate::events::BatchEvents;
use crate::format::TargetFormat;
use crate::reader::{read_batch, split_outcomes};
use crate::record::InputFile;

/// Reads `inputs` and converts every record that could be read.
///
/// Both phases share one [`BatchState`]. A record whose read failed is
/// terminal (`failed`) before conversion starts; its error appears in the
/// report but it produces no conversion events. Fails only for an empty
/// listing ([`crate::error::EmptyBatch`]).
pub async fn run_batch<E>(
    inputs: Vec<InputFile>,
    format: TargetFormat,
    resize: Option<ResizeOptions>,
    service: &ConversionService,
    events: &E,
) -> Result<BatchReport>
where
    E: BatchEvents + ?Sized,
{
    let mut state = BatchState::new(inputs.len());
    for index in 0..inputs.len() {
        state.advance(index, RecordStatus::Reading)?;
    }

    let (records, read_failures) = split_outcomes(read_batch(inputs, events).await?);
    for record in &records {
        state.advance(record.index(), RecordStatus::Read)?;
    }
    for (index, _) in &read_failures {
        state.advance(*index, RecordStatus::Failed)?;
    }
    tracing::debug!(
        read = records.len(),
        failed = read_failures.len(),
        %format,
        "starting conversion"
    );

    let mut report = BatchCoordinator::new(service, events)
        .convert_batch(state, records, format, resize)
        .await;
    for (index, e) in read_failures {
        report.outcomes.insert(index, Err(e));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::RemoteClient;
    use crate::error::{ConvertError, EmptyBatch};
    use crate::test_support::{png_bytes, Event, Recorder};

    fn service() -> ConversionService {
        ConversionService::new(true, RemoteClient::new("http://127.0.0.1:1/api/convert"))
    }

    #[tokio::test]
    async fn empty_listing_fails_before_any_event() {
        let events = Recorder::default();
        let err = run_batch(Vec::new(), TargetFormat::Webp, None, &service(), &events)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<EmptyBatch>().is_some());
        assert!(events.events().is_empty());
    }

    #[tokio::test]
    async fn read_failures_are_reported_and_the_rest_convert() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        std::fs::write(&good, png_bytes(12, 12)).unwrap();
        let inputs = vec![
            InputFile::from(good),
            InputFile::from(dir.path().join("missing.png")),
            InputFile::memory("mem.png", png_bytes(6, 6)),
        ];
        let events = Recorder::default();
        let report = run_batch(inputs, TargetFormat::Webp, None, &service(), &events)
            .await
            .unwrap();

        assert!(report.state.is_done());
        assert_eq!(report.state.status(0), Some(RecordStatus::Completed));
        assert_eq!(report.state.status(1), Some(RecordStatus::Failed));
        assert_eq!(report.state.status(2), Some(RecordStatus::Completed));
        assert!(matches!(report.outcomes[&1], Err(ConvertError::Read(_))));
        assert_eq!(report.outcomes.len(), 3);

        let log = events.events();
        assert!(log.contains(&Event::Read(1, false)));
        assert!(!log.iter().any(|e| matches!(e, Event::Start(1, _) | Event::Failed(1, _))));
        assert_eq!(events.batch_completions(), 1);
        assert_eq!(log.last(), Some(&Event::BatchComplete));
    }
}
