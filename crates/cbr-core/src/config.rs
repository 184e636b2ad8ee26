use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::{BackoffPolicy, WaitConfig};

/// Wait-loop tuning (optional `[wait]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitSettings {
    /// Total time budget in seconds before a wait gives up.
    pub max_wait_secs: u64,
    /// First delay between probes, in milliseconds.
    pub base_delay_ms: u64,
    /// Exponential growth factor per probe.
    pub multiplier: f64,
    /// Maximum random extra delay per probe, in milliseconds.
    pub jitter_ms: u64,
    /// Upper bound on any single delay, in seconds.
    pub ceiling_secs: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            max_wait_secs: 1800,
            base_delay_ms: 2000,
            multiplier: 1.4,
            jitter_ms: 1000,
            ceiling_secs: 180,
        }
    }
}

impl WaitSettings {
    /// Engine-facing view of these settings.
    pub fn to_wait_config(&self) -> WaitConfig {
        WaitConfig {
            max_wait: Duration::from_secs(self.max_wait_secs),
            backoff: BackoffPolicy::Exponential {
                base: Duration::from_millis(self.base_delay_ms),
                multiplier: self.multiplier,
                jitter: Duration::from_millis(self.jitter_ms),
                ceiling: Duration::from_secs(self.ceiling_secs),
            },
        }
    }
}

/// Global configuration loaded from `~/.config/cbr/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CbrConfig {
    /// Base URL of the backup service.
    pub endpoint: String,
    /// Bearer token sent with every request; the `CBR_TOKEN` environment
    /// variable overrides it.
    #[serde(default)]
    pub token: Option<String>,
    /// Default project used to expand bare plan ids on the command line.
    #[serde(default)]
    pub project: Option<String>,
    /// Default location used to expand bare plan ids on the command line.
    #[serde(default)]
    pub location: Option<String>,
    /// Optional wait tuning; if missing, built-in defaults are used.
    #[serde(default)]
    pub wait: Option<WaitSettings>,
}

impl Default for CbrConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/".to_string(),
            token: None,
            project: None,
            location: None,
            wait: None,
        }
    }
}

impl CbrConfig {
    /// Token to send with requests, preferring `CBR_TOKEN` over the file.
    pub fn resolved_token(&self) -> Option<String> {
        std::env::var("CBR_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone())
    }

    /// Wait tuning from the `[wait]` section, or built-in defaults.
    pub fn wait_config(&self) -> WaitConfig {
        self.wait
            .as_ref()
            .map(WaitSettings::to_wait_config)
            .unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cbr")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CbrConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CbrConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: CbrConfig = toml::from_str(&data)?;
    Ok(cfg)
}
