//! Configuration for threadlens
//!
//! Settings come from a YAML file (`$THREADLENS_CONFIG`, else
//! `<config dir>/threadlens/config.yaml`), then environment overrides. Every
//! field has a default so a missing file is not an error.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
pub const DEFAULT_SCRAPER_URL: &str =
  "https://dt5nzo67tiek5d5jvxhbsq5dey0nuyyl.lambda-url.ca-central-1.on.aws/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  /// Base URL of the insights REST backend
  #[serde(default = "default_backend_url")]
  pub backend_url: String,
  /// Base URL of the scraper Lambda function
  #[serde(default = "default_scraper_url")]
  pub scraper_url: String,
  /// Path of the chat endpoint relative to `backend_url`
  #[serde(default = "default_chat_path")]
  pub chat_path: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Where transcripts and downloads live; platform data dir when unset
  #[serde(default)]
  pub data_dir: Option<PathBuf>,
}

fn default_backend_url() -> String {
  DEFAULT_BACKEND_URL.to_string()
}
fn default_scraper_url() -> String {
  DEFAULT_SCRAPER_URL.to_string()
}
fn default_chat_path() -> String {
  "/ai/chat".to_string()
}
fn default_timeout_secs() -> u64 {
  30
}

impl Default for Config {
  fn default() -> Self {
    Self {
      backend_url: default_backend_url(),
      scraper_url: default_scraper_url(),
      chat_path: default_chat_path(),
      timeout_secs: default_timeout_secs(),
      data_dir: None,
    }
  }
}

impl Config {
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
    if content.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(&content)
      .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
  }

  /// Config file location, honouring `THREADLENS_CONFIG`
  pub fn default_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("THREADLENS_CONFIG") {
      return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("threadlens").join("config.yaml"))
  }

  /// Load the config file if present, apply environment overrides, validate
  pub fn load() -> Result<Self, ConfigError> {
    let mut config = match Self::default_path() {
      Some(path) if path.exists() => {
        debug!("Loading config from {}", path.display());
        Self::load_from_file(&path)?
      }
      _ => Self::default(),
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
  }

  fn apply_env(&mut self) -> Result<(), ConfigError> {
    if let Ok(url) = env::var("THREADLENS_BACKEND_URL") {
      self.backend_url = url;
    }
    if let Ok(url) = env::var("THREADLENS_SCRAPER_URL") {
      self.scraper_url = url;
    }
    if let Ok(secs) = env::var("THREADLENS_TIMEOUT_SECS") {
      self.timeout_secs = secs.trim().parse().map_err(|_| {
        ConfigError::invalid_value("THREADLENS_TIMEOUT_SECS", format!("'{secs}' is not a number of seconds"))
      })?;
    }
    if let Ok(home) = env::var("THREADLENS_HOME") {
      self.data_dir = Some(PathBuf::from(home));
    }
    Ok(())
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    for (key, value) in [("backend_url", &self.backend_url), ("scraper_url", &self.scraper_url)] {
      let url = Url::parse(value).map_err(|e| ConfigError::invalid_value(key, e.to_string()))?;
      if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid_value(key, format!("unsupported scheme '{}'", url.scheme())));
      }
    }
    if self.timeout_secs == 0 {
      return Err(ConfigError::invalid_value("timeout_secs", "must be at least 1"));
    }
    Ok(())
  }

  /// Directory for local state, e.g. chat transcripts
  pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
    match &self.data_dir {
      Some(dir) => Ok(dir.clone()),
      None => dirs::data_dir().map(|dir| dir.join("threadlens")).ok_or(ConfigError::NoDataDir),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  const VARS: [&str; 5] = [
    "THREADLENS_CONFIG",
    "THREADLENS_BACKEND_URL",
    "THREADLENS_SCRAPER_URL",
    "THREADLENS_TIMEOUT_SECS",
    "THREADLENS_HOME",
  ];

  fn clear_env() {
    for var in VARS {
      env::remove_var(var);
    }
  }

  #[test]
  fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "backend_url: http://example.com:8080\ntimeout_secs: 5\n").unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.backend_url, "http://example.com:8080");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.chat_path, "/ai/chat");
    assert_eq!(config.scraper_url, DEFAULT_SCRAPER_URL);
  }

  #[test]
  fn test_malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "timeout_secs: [not, a, number]\n").unwrap();
    assert!(matches!(Config::load_from_file(&path), Err(ConfigError::Parse { .. })));
  }

  #[test]
  #[serial]
  fn test_env_overrides_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "backend_url: http://from-file:1\n").unwrap();

    env::set_var("THREADLENS_CONFIG", &path);
    env::set_var("THREADLENS_BACKEND_URL", "http://from-env:2");
    env::set_var("THREADLENS_HOME", dir.path());

    let config = Config::load().unwrap();
    assert_eq!(config.backend_url, "http://from-env:2");
    assert_eq!(config.data_dir().unwrap(), dir.path());
    clear_env();
  }

  #[test]
  #[serial]
  fn test_invalid_values_are_rejected() {
    clear_env();
    env::set_var("THREADLENS_CONFIG", "/nonexistent/threadlens.yaml");
    env::set_var("THREADLENS_TIMEOUT_SECS", "soon");
    assert!(matches!(Config::load(), Err(ConfigError::InvalidValue { .. })));

    env::remove_var("THREADLENS_TIMEOUT_SECS");
    env::set_var("THREADLENS_BACKEND_URL", "ftp://example.com");
    assert!(matches!(Config::load(), Err(ConfigError::InvalidValue { .. })));
    clear_env();
  }
}
