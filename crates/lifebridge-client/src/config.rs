//! Client configuration.

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/hospital";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection and storage settings.
///
/// Deserialised from the layered configuration (file, then `LIFEBRIDGE_*`
/// environment); missing keys fall back to [`Default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Base URL every API path is appended to.
  pub base_url:     String,
  /// Whole-request timeout applied to every call.
  pub timeout_secs: u64,
  /// Where the session token is persisted. Defaults to
  /// `<data dir>/lifebridge/token`.
  pub token_path:   Option<PathBuf>,
  /// Log file. Defaults to `<data dir>/lifebridge/lifebridge.log`.
  pub log_path:     Option<PathBuf>,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url:     DEFAULT_BASE_URL.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      token_path:   None,
      log_path:     None,
    }
  }
}

impl ClientConfig {
  pub fn token_path(&self) -> PathBuf {
    self
      .token_path
      .clone()
      .unwrap_or_else(|| data_dir().join("token"))
  }

  pub fn log_path(&self) -> PathBuf {
    self
      .log_path
      .clone()
      .unwrap_or_else(|| data_dir().join("lifebridge.log"))
  }
}

/// `<platform data dir>/lifebridge`, or `./.lifebridge` when the platform has
/// no data directory.
pub fn data_dir() -> PathBuf {
  dirs::data_dir()
    .map(|d| d.join("lifebridge"))
    .unwrap_or_else(|| PathBuf::from(".lifebridge"))
}

/// `<platform config dir>/lifebridge/config.toml`, if the platform has one.
pub fn default_config_file() -> Option<PathBuf> {
  dirs::config_dir().map(|d| d.join("lifebridge").join("config.toml"))
}
