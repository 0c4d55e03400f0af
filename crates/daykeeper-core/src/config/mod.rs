mod channels;
mod defaults;


pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::DaykeeperError;
use defaults::*;

/// Top-level Daykeeper configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daykeeper: DaykeeperConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub reading: ReadingConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaykeeperConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// UI language for every user ("Russian" or "English").
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for DaykeeperConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            language: default_language(),
        }
    }
}

impl DaykeeperConfig {
    /// Directory holding the snapshot files.
    pub fn snapshot_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand(&self.data_dir)).join("data")
    }

    /// Directory holding rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand(&self.data_dir)).join("logs")
    }
}

/// Scheduler configuration -- reminder sweep and daily reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_first_sweep_delay")]
    pub first_sweep_delay_secs: u64,
    /// Local wall-clock time of the daily archive-and-reset ("HH:MM").
    #[serde(default = "default_reset_time")]
    pub reset_time: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_interval_secs: default_sweep_interval(),
            first_sweep_delay_secs: default_first_sweep_delay(),
            reset_time: default_reset_time(),
        }
    }
}

/// Liveness HTTP endpoint for uptime monitors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

/// Random short-read delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingConfig {
    #[serde(default = "default_reading_dir")]
    pub dir: String,
    /// File extension to pick from, without the dot.
    #[serde(default = "default_reading_extension")]
    pub extension: String,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            dir: default_reading_dir(),
            extension: default_reading_extension(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, DaykeeperError> {
    let mut config = load_file(Path::new(path))?;
    apply_env_overrides(
        &mut config,
        std::env::var("TELEGRAM_TOKEN").ok(),
        std::env::var("PORT").ok(),
    )?;
    Ok(config)
}

fn load_file(path: &Path) -> Result<Config, DaykeeperError> {
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        DaykeeperError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;

    toml::from_str(&content)
        .map_err(|e| DaykeeperError::Config(format!("failed to parse config: {}", e)))
}

/// `TELEGRAM_TOKEN` and `PORT` win over the file when set and non-empty.
fn apply_env_overrides(
    config: &mut Config,
    token: Option<String>,
    port: Option<String>,
) -> Result<(), DaykeeperError> {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        config.telegram.bot_token = token.trim().to_string();
        config.telegram.enabled = true;
    }
    if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
        config.api.port = port
            .trim()
            .parse()
            .map_err(|e| DaykeeperError::Config(format!("invalid PORT '{port}': {e}")))?;
    }
    Ok(())
}
