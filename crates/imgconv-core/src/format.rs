//! Target formats and resize fit modes, with their wire names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    Webp,
    Avif,
}

impl TargetFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetFormat::Webp => "webp",
            TargetFormat::Avif => "avif",
        }
    }

    /// File extension written on converted files (no leading dot).
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            TargetFormat::Webp => "image/webp",
            TargetFormat::Avif => "image/avif",
        }
    }

    /// True when the in-process encoder can produce this format.
    pub fn is_locally_encodable(self) -> bool {
        matches!(self, TargetFormat::Webp)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webp" => Ok(TargetFormat::Webp),
            "avif" => Ok(TargetFormat::Avif),
            _ => Err(UnknownVariant {
                what: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Geometric policy for fitting an image into a target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Cover the box, preserving aspect ratio, cropping overflow.
    #[default]
    Cover,
    /// Fit within the box, preserving aspect ratio.
    Contain,
    /// Stretch to the exact box.
    Fill,
    /// Like contain, never upscaling.
    Inside,
    /// Like cover, never downscaling.
    Outside,
}

impl FitMode {
    pub const ALL: [FitMode; 5] = [
        FitMode::Cover,
        FitMode::Contain,
        FitMode::Fill,
        FitMode::Inside,
        FitMode::Outside,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
            FitMode::Fill => "fill",
            FitMode::Inside => "inside",
            FitMode::Outside => "outside",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FitMode::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| UnknownVariant {
                what: "fit mode",
                value: s.to_string(),
            })
    }
}

/// Parse failure for a format or fit mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value:?}")]
pub struct UnknownVariant {
    pub what: &'static str,
    pub value: String,
}
