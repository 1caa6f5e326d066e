//! Console rendering of batch events.

use imgconv_core::convert::{ConversionResult, ResizeOptions};
use imgconv_core::error::ConvertError;
use imgconv_core::events::{BatchEvents, TracingEvents};
use imgconv_core::format::TargetFormat;

/// Prints one line per finished file and forwards everything to the log.
pub struct ConsoleEvents {
    total: usize,
    log: TracingEvents,
}

impl ConsoleEvents {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            log: TracingEvents,
        }
    }
}

/// `reduction_percentage` is printed as-is: positive means the file shrank.
fn summary_line(index: usize, total: usize, result: &ConversionResult) -> String {
    format!(
        "  [{}/{}] {}  {} -> {} bytes ({:.2}% reduction, {})",
        index + 1,
        total,
        result.output_file_name,
        result.original_size,
        result.converted_size,
        result.reduction_percentage,
        result.method
    )
}

impl BatchEvents for ConsoleEvents {
    fn on_file_read(&self, index: usize, outcome: Result<(), &ConvertError>) {
        self.log.on_file_read(index, outcome);
        if let Err(e) = outcome {
            eprintln!("  [{}/{}] {}", index + 1, self.total, e);
        }
    }

    fn on_progress(&self, processed: usize, total: usize) {
        self.log.on_progress(processed, total);
    }

    fn on_conversion_start(&self, index: usize, format: TargetFormat) {
        self.log.on_conversion_start(index, format);
    }

    fn on_conversion_complete(
        &self,
        index: usize,
        result: &ConversionResult,
        format: TargetFormat,
        resize: Option<&ResizeOptions>,
    ) {
        self.log.on_conversion_complete(index, result, format, resize);
        println!("{}", summary_line(index, self.total, result));
    }

    fn on_conversion_failed(&self, index: usize, error: &ConvertError) {
        self.log.on_conversion_failed(index, error);
        eprintln!("  [{}/{}] failed: {}", index + 1, self.total, error);
    }

    fn on_batch_complete(&self) {
        self.log.on_batch_complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgconv_core::convert::{reduction_percentage, ConversionMethod};
    use std::sync::Arc;

    fn result(original: u64, converted: u64) -> ConversionResult {
        ConversionResult {
            original_size: original,
            converted_size: converted,
            reduction_percentage: reduction_percentage(original, converted),
            encoded: Arc::from(vec![0u8; converted as usize]),
            output_file_name: "a.webp".into(),
            format: TargetFormat::Webp,
            method: ConversionMethod::Local,
        }
    }

    #[test]
    fn shrunk_file_shows_positive_reduction() {
        let line = summary_line(0, 2, &result(1000, 250));
        assert_eq!(line, "  [1/2] a.webp  1000 -> 250 bytes (75.00% reduction, local)");
    }

    #[test]
    fn grown_file_shows_negative_reduction() {
        let line = summary_line(1, 2, &result(200, 300));
        assert!(line.contains("(-50.00% reduction, local)"), "{}", line);
    }
}
