use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml). Absent = no retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per fetch (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    /// Out-of-range base delays (huge, infinite) fall back to `max_delay`.
    pub fn to_policy(&self) -> RetryPolicy {
        let max_delay = Duration::from_secs(self.max_delay_secs);
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::try_from_secs_f64(self.base_delay_secs.max(0.0))
                .unwrap_or(max_delay),
            max_delay,
        }
    }
}

/// Global configuration loaded from `~/.config/hlsdm/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HlsdmConfig {
    /// Root directory for per-job folders. None = `$XDG_DATA_HOME/hlsdm/downloads`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
    /// Maximum number of jobs driven at once.
    pub max_concurrent_jobs: usize,
    /// Connect timeout per request, seconds.
    pub connect_timeout_secs: u64,
    /// Abort a transfer that stays under 1 KiB/s for this many seconds.
    pub stall_timeout_secs: u64,
    /// Hard cap per request, seconds.
    pub request_timeout_secs: u64,
    /// Optional User-Agent header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Optional retry policy; if missing, fetches are attempted once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

impl Default for HlsdmConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            max_concurrent_jobs: 4,
            connect_timeout_secs: 15,
            stall_timeout_secs: 60,
            request_timeout_secs: 600,
            user_agent: None,
            retry: None,
        }
    }
}

impl HlsdmConfig {
    /// Retry policy for fetches: the `[retry]` section, or a single attempt.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_else(RetryPolicy::no_retry)
    }

    /// Configured download root, or the XDG data default.
    pub fn resolved_download_dir(&self) -> Result<PathBuf> {
        match &self.download_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_download_dir(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hlsdm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// `$XDG_DATA_HOME/hlsdm/downloads`
pub fn default_download_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hlsdm")?;
    Ok(xdg_dirs.get_data_home().join("hlsdm").join("downloads"))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HlsdmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HlsdmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: HlsdmConfig = toml::from_str(&data)?;
    Ok(cfg)
}
