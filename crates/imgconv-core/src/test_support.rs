//! Shared fixtures for unit tests.

use std::io::Cursor;
use std::sync::Mutex;

use image::DynamicImage;

use crate::convert::{ConversionResult, ResizeOptions};
use crate::error::ConvertError;
use crate::events::BatchEvents;
use crate::format::TargetFormat;

/// Small gradient PNG.
pub fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(w, h, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
    });
    encode_png(DynamicImage::ImageRgb8(img))
}

/// PNG of pseudo-random pixels; barely compresses, so the file is roughly `w * h * 3` bytes.
pub fn noise_png(w: u32, h: u32, seed: u32) -> Vec<u8> {
    let mut x = seed.wrapping_mul(2_654_435_761).max(1);
    let img = image::RgbImage::from_fn(w, h, |_, _| {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        let b = x.to_le_bytes();
        image::Rgb([b[0], b[1], b[2]])
    });
    encode_png(DynamicImage::ImageRgb8(img))
}

fn encode_png(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Read(usize, bool),
    Progress(usize, usize),
    Start(usize, TargetFormat),
    Complete(usize, String),
    Failed(usize, &'static str),
    BatchComplete,
}

/// Event sink that records everything in arrival order.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn batch_completions(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == Event::BatchComplete)
            .count()
    }

    fn push(&self, e: Event) {
        self.events.lock().unwrap().push(e);
    }
}

impl BatchEvents for Recorder {
    fn on_file_read(&self, index: usize, outcome: Result<(), &ConvertError>) {
        self.push(Event::Read(index, outcome.is_ok()));
    }

    fn on_progress(&self, processed: usize, total: usize) {
        self.push(Event::Progress(processed, total));
    }

    fn on_conversion_start(&self, index: usize, format: TargetFormat) {
        self.push(Event::Start(index, format));
    }

    fn on_conversion_complete(
        &self,
        index: usize,
        result: &ConversionResult,
        _format: TargetFormat,
        _resize: Option<&ResizeOptions>,
    ) {
        self.push(Event::Complete(index, result.output_file_name.clone()));
    }

    fn on_conversion_failed(&self, index: usize, error: &ConvertError) {
        self.push(Event::Failed(index, error.kind()));
    }

    fn on_batch_complete(&self) {
        self.push(Event::BatchComplete);
    }
}
