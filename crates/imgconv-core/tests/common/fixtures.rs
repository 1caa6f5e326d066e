//! Image fixtures and an event recorder.

use std::io::Cursor;
use std::sync::Mutex;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imgconv_core::convert::{ConversionResult, ResizeOptions};
use imgconv_core::error::ConvertError;
use imgconv_core::events::BatchEvents;
use imgconv_core::format::TargetFormat;

pub fn gradient_png(w: u32, h: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// Incompressible PNG, about `w * h * 3` bytes on disk.
pub fn noise_png(w: u32, h: u32, seed: u32) -> Vec<u8> {
    let mut x = seed.wrapping_mul(0x9E37_79B1) | 1;
    let img = RgbImage::from_fn(w, h, |_, _| {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        let b = x.to_le_bytes();
        Rgb([b[0], b[1], b[2]])
    });
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

pub fn jpeg(w: u32, h: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 64]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Read(usize, bool),
    Progress(usize, usize),
    Start(usize, TargetFormat),
    Complete(usize, u64),
    Failed(usize, Option<u32>),
    BatchComplete,
}

#[derive(Default)]
pub struct Recorder(Mutex<Vec<Seen>>);

impl Recorder {
    pub fn seen(&self) -> Vec<Seen> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Seen) -> bool) -> usize {
        self.seen().iter().filter(|s| pred(s)).count()
    }
}

impl BatchEvents for Recorder {
    fn on_file_read(&self, index: usize, outcome: Result<(), &ConvertError>) {
        self.0.lock().unwrap().push(Seen::Read(index, outcome.is_ok()));
    }

    fn on_progress(&self, processed: usize, total: usize) {
        self.0.lock().unwrap().push(Seen::Progress(processed, total));
    }

    fn on_conversion_start(&self, index: usize, format: TargetFormat) {
        self.0.lock().unwrap().push(Seen::Start(index, format));
    }

    fn on_conversion_complete(
        &self,
        index: usize,
        result: &ConversionResult,
        _format: TargetFormat,
        _resize: Option<&ResizeOptions>,
    ) {
        self.0
            .lock()
            .unwrap()
            .push(Seen::Complete(index, result.converted_size));
    }

    fn on_conversion_failed(&self, index: usize, error: &ConvertError) {
        self.0
            .lock()
            .unwrap()
            .push(Seen::Failed(index, error.http_status()));
    }

    fn on_batch_complete(&self) {
        self.0.lock().unwrap().push(Seen::BatchComplete);
    }
}
