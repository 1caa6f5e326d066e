//! `imgconv convert <files>...` – read, convert and write a batch.

use anyhow::{Context, Result};
use imgconv_core::config::ImgconvConfig;
use imgconv_core::convert::{ConversionService, RemoteClient, ResizeOptions};
use imgconv_core::format::{FitMode, TargetFormat};
use imgconv_core::output::OutputWriter;
use imgconv_core::record::InputFile;
use imgconv_core::session::run_batch;
use std::path::PathBuf;

use crate::cli::console::ConsoleEvents;

#[derive(Debug)]
pub struct ConvertOptions {
    pub files: Vec<PathBuf>,
    pub format: Option<TargetFormat>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Option<FitMode>,
    pub out_dir: Option<PathBuf>,
    pub force_remote: bool,
    pub overwrite: bool,
}

pub async fn run_convert(cfg: &ImgconvConfig, opts: ConvertOptions) -> Result<()> {
    let format = opts.format.unwrap_or(cfg.default_format);
    let resize = ResizeOptions::from_parts(opts.width, opts.height, opts.fit)?;
    let service = build_service(cfg, opts.force_remote);
    let out_dir = match opts.out_dir.or_else(|| cfg.output_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir().context("current directory")?,
    };

    let total = opts.files.len();
    let inputs: Vec<InputFile> = opts.files.into_iter().map(InputFile::from).collect();
    println!(
        "Converting {} file(s) to {} ({})",
        total,
        format,
        service.strategy_for(format)
    );

    let events = ConsoleEvents::new(total);
    let report = run_batch(inputs, format, resize, &service, &events).await?;

    let written = OutputWriter::new(&out_dir)
        .overwrite(opts.overwrite)
        .write_all(report.completed().map(|(_, r)| r))
        .await?;
    let (before, after) = report
        .completed()
        .fold((0u64, 0u64), |(b, a), (_, r)| (b + r.original_size, a + r.converted_size));
    println!(
        "Wrote {} file(s) to {} ({} -> {} bytes)",
        written.len(),
        out_dir.display(),
        before,
        after
    );

    let failed = report.failed_count();
    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, total);
    }
    Ok(())
}

fn build_service(cfg: &ImgconvConfig, force_remote: bool) -> ConversionService {
    if force_remote {
        ConversionService::new(false, RemoteClient::from_config(cfg)).with_quality(cfg.quality)
    } else {
        ConversionService::from_config(cfg)
    }
}
