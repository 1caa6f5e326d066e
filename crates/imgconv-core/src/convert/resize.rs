//! Resize options and the fit-mode geometry used by the local encoder.

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::format::FitMode;

/// Requested resize. At least one of width/height is set and neither is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeOptions {
    width: Option<u32>,
    height: Option<u32>,
    fit: FitMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidResize {
    #[error("resize needs a width or a height")]
    NoDimensions,
    #[error("resize {0} must be greater than zero")]
    ZeroDimension(&'static str),
}

impl ResizeOptions {
    pub fn new(width: Option<u32>, height: Option<u32>, fit: FitMode) -> Result<Self, InvalidResize> {
        if width.is_none() && height.is_none() {
            return Err(InvalidResize::NoDimensions);
        }
        if width == Some(0) {
            return Err(InvalidResize::ZeroDimension("width"));
        }
        if height == Some(0) {
            return Err(InvalidResize::ZeroDimension("height"));
        }
        Ok(Self { width, height, fit })
    }

    /// Builds options from loose parts (CLI flags, form values).
    /// Without a width or height there is no resize at all, whatever `fit` says.
    pub fn from_parts(
        width: Option<u32>,
        height: Option<u32>,
        fit: Option<FitMode>,
    ) -> Result<Option<Self>, InvalidResize> {
        if width.is_none() && height.is_none() {
            if let Some(fit) = fit {
                tracing::debug!(%fit, "fit mode given without dimensions; ignoring");
            }
            return Ok(None);
        }
        Self::new(width, height, fit.unwrap_or_default()).map(Some)
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn fit(&self) -> FitMode {
        self.fit
    }
}

/// Centered crop applied after scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Scale-then-crop steps for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub crop: Option<CropRect>,
}

/// Longest side libwebp accepts.
pub const MAX_SIDE: u32 = 16_383;

/// Largest bitmap a plan may allocate before cropping (`MAX_SIDE` squared).
pub const MAX_PIXELS: u64 = MAX_SIDE as u64 * MAX_SIDE as u64;

impl ResizePlan {
    /// Final output dimensions.
    pub fn output_dimensions(&self) -> (u32, u32) {
        match self.crop {
            Some(c) => (c.width, c.height),
            None => (self.scaled_width, self.scaled_height),
        }
    }

    /// Pixels of the scaled bitmap, before any crop.
    pub fn scaled_pixels(&self) -> u64 {
        u64::from(self.scaled_width) * u64::from(self.scaled_height)
    }

    /// False when executing the plan would allocate more than [`MAX_PIXELS`]
    /// or produce a side longer than [`MAX_SIDE`].
    pub fn within_limits(&self) -> bool {
        let (w, h) = self.output_dimensions();
        self.scaled_pixels() <= MAX_PIXELS && w <= MAX_SIDE && h <= MAX_SIDE
    }
}

fn scaled(len: u32, factor: f64) -> u32 {
    ((len as f64 * factor).round() as u32).max(1)
}

fn keep(w: u32, h: u32) -> ResizePlan {
    ResizePlan {
        scaled_width: w,
        scaled_height: h,
        crop: None,
    }
}

/// Computes how an image of `src_w × src_h` is resized under `opts`.
///
/// With a single dimension the other follows the source aspect ratio and the
/// fit mode only decides whether scaling is allowed in that direction.
/// `cover` crops the overflow around the centre; `outside` scales like cover
/// (never below the original size) and keeps the overflow.
pub fn plan(src_w: u32, src_h: u32, opts: &ResizeOptions) -> ResizePlan {
    let src_w = src_w.max(1);
    let src_h = src_h.max(1);

    let (box_w, box_h) = match (opts.width, opts.height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => {
            let factor = w as f64 / src_w as f64;
            return plan_single_side(src_w, src_h, factor, opts.fit, || {
                keep(w, scaled(src_h, factor))
            });
        }
        (None, Some(h)) => {
            let factor = h as f64 / src_h as f64;
            return plan_single_side(src_w, src_h, factor, opts.fit, || {
                keep(scaled(src_w, factor), h)
            });
        }
        (None, None) => return keep(src_w, src_h),
    };

    let sx = box_w as f64 / src_w as f64;
    let sy = box_h as f64 / src_h as f64;
    let uniform = |factor: f64| keep(scaled(src_w, factor), scaled(src_h, factor));

    match opts.fit {
        FitMode::Fill => keep(box_w, box_h),
        FitMode::Contain => uniform(sx.min(sy)),
        FitMode::Inside => uniform(sx.min(sy).min(1.0)),
        FitMode::Outside => uniform(sx.max(sy).max(1.0)),
        FitMode::Cover => {
            let factor = sx.max(sy);
            // Rounding may land a pixel short of the box; never crop into nothing.
            let scaled_width = scaled(src_w, factor).max(box_w);
            let scaled_height = scaled(src_h, factor).max(box_h);
            let crop = if (scaled_width, scaled_height) == (box_w, box_h) {
                None
            } else {
                Some(CropRect {
                    x: (scaled_width - box_w) / 2,
                    y: (scaled_height - box_h) / 2,
                    width: box_w,
                    height: box_h,
                })
            };
            ResizePlan {
                scaled_width,
                scaled_height,
                crop,
            }
        }
    }
}

fn plan_single_side(
    src_w: u32,
    src_h: u32,
    factor: f64,
    fit: FitMode,
    proportional: impl FnOnce() -> ResizePlan,
) -> ResizePlan {
    match fit {
        FitMode::Inside if factor > 1.0 => keep(src_w, src_h),
        FitMode::Outside if factor < 1.0 => keep(src_w, src_h),
        _ => proportional(),
    }
}

/// Applies a plan to a decoded image.
pub fn apply(img: DynamicImage, plan: &ResizePlan) -> DynamicImage {
    let mut out = if (img.width(), img.height()) == (plan.scaled_width, plan.scaled_height) {
        img
    } else {
        img.resize_exact(plan.scaled_width, plan.scaled_height, FilterType::Lanczos3)
    };
    if let Some(c) = plan.crop {
        out = out.crop_imm(c.x, c.y, c.width, c.height);
    }
    out
}
