use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::format::TargetFormat;

/// Remote endpoint tuning (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Seconds to wait for the TCP/TLS connection to the endpoint.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole upload + conversion + response.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 120,
        }
    }
}

impl RemoteConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/imgconv/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImgconvConfig {
    /// URL of the remote conversion endpoint (multipart POST).
    pub remote_endpoint: String,
    /// Whether in-process WebP encoding is available. When false every request goes remote.
    pub local_encoding: bool,
    /// Local encoder quality on a 0–1 scale.
    pub quality: f32,
    /// Format used when the CLI is not told otherwise.
    #[serde(default)]
    pub default_format: TargetFormat,
    /// Where the CLI writes converted files (None = current directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Optional remote tuning; if missing, built-in defaults are used.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl Default for ImgconvConfig {
    fn default() -> Self {
        Self {
            remote_endpoint: "http://127.0.0.1:3000/api/convert".to_string(),
            local_encoding: true,
            quality: 0.8,
            default_format: TargetFormat::Webp,
            output_dir: None,
            remote: None,
        }
    }
}

impl ImgconvConfig {
    /// Remote settings, falling back to defaults when the section is absent.
    pub fn remote_or_default(&self) -> RemoteConfig {
        self.remote.clone().unwrap_or_default()
    }

    /// Reject values the service cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            anyhow::bail!("quality must be in (0, 1], got {}", self.quality);
        }
        let endpoint = url::Url::parse(&self.remote_endpoint)
            .map_err(|e| anyhow::anyhow!("invalid remote_endpoint {:?}: {}", self.remote_endpoint, e))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            anyhow::bail!("remote_endpoint must be http or https, got {}", endpoint.scheme());
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgconv")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgconvConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgconvConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ImgconvConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}
