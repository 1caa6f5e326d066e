//! `imgconv config` – show config path and effective settings.

use anyhow::Result;
use imgconv_core::config::{self, ImgconvConfig};
use imgconv_core::logging;

pub fn run_config(cfg: &ImgconvConfig) -> Result<()> {
    let remote = cfg.remote_or_default();
    println!("config file:      {}", config::config_path()?.display());
    if let Ok(log) = logging::log_file_path() {
        println!("log file:         {}", log.display());
    }
    println!("remote endpoint:  {}", cfg.remote_endpoint);
    println!("local encoding:   {}", if cfg.local_encoding { "on" } else { "off" });
    println!("quality:          {}", cfg.quality);
    println!("default format:   {}", cfg.default_format);
    println!(
        "output dir:       {}",
        cfg.output_dir
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(current directory)".to_string())
    );
    println!(
        "remote timeouts:  connect {}s, total {}s",
        remote.connect_timeout_secs, remote.timeout_secs
    );
    Ok(())
}
