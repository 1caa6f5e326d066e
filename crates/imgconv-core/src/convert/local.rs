//! In-process strategy: decode, optionally resize, encode WebP with libwebp.
//!
//! Blocking; the service runs it on the blocking pool. Every call decodes its
//! own bitmap, so concurrent conversions never share a drawing surface.

use image::DynamicImage;
use std::borrow::Cow;

use super::resize;
use super::result::{ConversionMethod, ConversionResult};
use super::ConversionRequest;
use crate::error::ConvertError;
use crate::format::TargetFormat;

/// Converts one request locally. `quality` is on a 0–1 scale.
pub(crate) fn convert_local(
    request: &ConversionRequest,
    quality: f32,
) -> Result<ConversionResult, ConvertError> {
    let format = request.format();
    let record = request.record();
    let mut img = record.decode()?;
    if let Some(opts) = request.resize() {
        let plan = resize::plan(img.width(), img.height(), opts);
        if !plan.within_limits() {
            return Err(ConvertError::conversion(format!(
                "resize to {}x{} exceeds the {} pixel / {} px per side limit",
                plan.scaled_width,
                plan.scaled_height,
                resize::MAX_PIXELS,
                resize::MAX_SIDE
            )));
        }
        tracing::trace!(index = record.index(), ?plan, "resizing");
        img = resize::apply(img, &plan);
    }

    let encoded = match format {
        TargetFormat::Webp => encode_webp(&img, quality)?,
        other => {
            return Err(ConvertError::conversion(format!(
                "{} cannot be encoded locally",
                other
            )))
        }
    };
    Ok(ConversionResult::from_encoded(
        record,
        format,
        encoded,
        ConversionMethod::Local,
    ))
}

/// Lossy WebP at `quality` (0–1). libwebp only takes 8-bit RGB/RGBA input.
pub(crate) fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, ConvertError> {
    let img: Cow<'_, DynamicImage> = match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(img),
        other if other.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8())),
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    };
    let encoder = webp::Encoder::from_image(&img)
        .map_err(|reason| ConvertError::conversion(format!("webp encoder: {}", reason)))?;
    let memory = encoder.encode(quality.clamp(0.0, 1.0) * 100.0);
    if memory.is_empty() {
        return Err(ConvertError::conversion("webp encoder produced no output"));
    }
    Ok(memory.to_vec())
}
