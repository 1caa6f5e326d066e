//! Event sink for UI collaborators.
//!
//! The reader and the batch coordinator report every state change through a
//! [`BatchEvents`] implementation passed in by the caller. All methods default
//! to no-ops so a sink only implements what it renders.

use crate::convert::{ConversionResult, ResizeOptions};
use crate::error::ConvertError;
use crate::format::TargetFormat;

pub trait BatchEvents: Send + Sync {
    /// A file finished reading (successfully or not).
    fn on_file_read(&self, _index: usize, _outcome: Result<(), &ConvertError>) {}

    /// Read progress: files processed so far out of the listing.
    fn on_progress(&self, _processed: usize, _total: usize) {}

    fn on_conversion_start(&self, _index: usize, _format: TargetFormat) {}

    fn on_conversion_complete(
        &self,
        _index: usize,
        _result: &ConversionResult,
        _format: TargetFormat,
        _resize: Option<&ResizeOptions>,
    ) {
    }

    fn on_conversion_failed(&self, _index: usize, _error: &ConvertError) {}

    /// Fired exactly once per batch, after every record is terminal.
    fn on_batch_complete(&self) {}
}

/// Sink that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl BatchEvents for NoopEvents {}

/// Sink that turns events into structured log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl BatchEvents for TracingEvents {
    fn on_file_read(&self, index: usize, outcome: Result<(), &ConvertError>) {
        match outcome {
            Ok(()) => tracing::debug!(index, "file read"),
            Err(e) => tracing::warn!(index, error = %e, "file read failed"),
        }
    }

    fn on_progress(&self, processed: usize, total: usize) {
        tracing::debug!(processed, total, "read progress");
    }

    fn on_conversion_start(&self, index: usize, format: TargetFormat) {
        tracing::debug!(index, %format, "conversion started");
    }

    fn on_conversion_complete(
        &self,
        index: usize,
        result: &ConversionResult,
        format: TargetFormat,
        resize: Option<&ResizeOptions>,
    ) {
        tracing::info!(
            index,
            %format,
            file = %result.output_file_name,
            original = result.original_size,
            converted = result.converted_size,
            reduction = result.reduction_percentage,
            method = %result.method,
            resized = resize.is_some(),
            "conversion completed"
        );
    }

    fn on_conversion_failed(&self, index: usize, error: &ConvertError) {
        tracing::warn!(index, kind = error.kind(), error = %error, "conversion failed");
    }

    fn on_batch_complete(&self) {
        tracing::info!("batch complete");
    }
}
