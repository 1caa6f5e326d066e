//! Image conversion service.
//!
//! Converts one [`FileRecord`] into a target format, routing each request to
//! the local encoder or the remote endpoint (see [`select_strategy`]). The
//! service holds no per-request state; the local capability flag is fixed at
//! construction.

mod local;
pub mod remote;
mod resize;
mod result;
mod strategy;

use crate::config::ImgconvConfig;
use crate::error::ConvertError;
use crate::format::TargetFormat;
use crate::record::FileRecord;

pub use remote::RemoteClient;
pub use resize::{
    plan as plan_resize, CropRect, InvalidResize, ResizeOptions, ResizePlan, MAX_PIXELS, MAX_SIDE,
};
pub use result::{output_file_name, reduction_percentage, ConversionMethod, ConversionResult};
pub use strategy::{select_strategy, Strategy};

/// One record, one format, optional resize.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    record: FileRecord,
    format: TargetFormat,
    resize: Option<ResizeOptions>,
}

impl ConversionRequest {
    pub fn new(record: FileRecord, format: TargetFormat, resize: Option<ResizeOptions>) -> Self {
        Self {
            record,
            format,
            resize,
        }
    }

    pub fn record(&self) -> &FileRecord {
        &self.record
    }

    pub fn format(&self) -> TargetFormat {
        self.format
    }

    pub fn resize(&self) -> Option<&ResizeOptions> {
        self.resize.as_ref()
    }
}

/// Reference quality of the local encoder (0–1 scale).
pub const DEFAULT_QUALITY: f32 = 0.8;

#[derive(Debug, Clone)]
pub struct ConversionService {
    local_capable: bool,
    quality: f32,
    remote: RemoteClient,
}

impl ConversionService {
    pub fn new(local_capable: bool, remote: RemoteClient) -> Self {
        Self {
            local_capable,
            quality: DEFAULT_QUALITY,
            remote,
        }
    }

    pub fn from_config(cfg: &ImgconvConfig) -> Self {
        Self::new(cfg.local_encoding, RemoteClient::from_config(cfg)).with_quality(cfg.quality)
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    pub fn local_capable(&self) -> bool {
        self.local_capable
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn remote(&self) -> &RemoteClient {
        &self.remote
    }

    pub fn strategy_for(&self, format: TargetFormat) -> Strategy {
        select_strategy(format, self.local_capable)
    }

    /// Converts one request. Never panics out: a failed or panicking worker becomes a [`ConvertError`].
    pub async fn convert(&self, request: ConversionRequest) -> Result<ConversionResult, ConvertError> {
        let strategy = self.strategy_for(request.format());
        tracing::debug!(
            index = request.record().index(),
            format = %request.format(),
            %strategy,
            "converting"
        );

        let service = self.clone();
        tokio::task::spawn_blocking(move || match strategy {
            Strategy::Local => local::convert_local(&request, service.quality),
            Strategy::Remote => service.remote.convert_blocking(&request),
        })
        .await
        .unwrap_or_else(|e| Err(ConvertError::conversion(format!("conversion task: {}", e))))
    }
}
