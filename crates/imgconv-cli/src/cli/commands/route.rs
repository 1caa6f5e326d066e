//! `imgconv route <format>` – which strategy a format would use.

use imgconv_core::config::ImgconvConfig;
use imgconv_core::convert::{ConversionService, Strategy};
use imgconv_core::format::TargetFormat;

pub fn run_route(cfg: &ImgconvConfig, format: TargetFormat) {
    let service = ConversionService::from_config(cfg);
    match service.strategy_for(format) {
        Strategy::Local => println!("{format}: local (quality {})", service.quality()),
        Strategy::Remote => println!("{format}: remote ({})", service.remote().endpoint()),
    }
}
