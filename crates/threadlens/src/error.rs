//! Error types shared across the crate
//!
//! Backend failures are recoverable: callers catch
//! [`BackendError`] and fall back to local data. The remaining variants cover
//! blocking user-input validation and local I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
  #[error("Request to {endpoint} failed: {source}")]
  Transport {
    endpoint: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Request to {endpoint} timed out after {secs}s")]
  Timeout { endpoint: String, secs: u64 },

  #[error("{endpoint} returned HTTP {status}")]
  Status { endpoint: String, status: u16 },

  #[error("{endpoint} returned an unexpected response: {message}")]
  Schema { endpoint: String, message: String },
}

impl BackendError {
  pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
    Self::Transport { endpoint: endpoint.into(), source }
  }

  pub fn timeout(endpoint: impl Into<String>, secs: u64) -> Self {
    Self::Timeout { endpoint: endpoint.into(), secs }
  }

  pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
    Self::Status { endpoint: endpoint.into(), status }
  }

  pub fn schema(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Schema { endpoint: endpoint.into(), message: message.into() }
  }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScraperError {
  #[error("Please fill in both subreddits and number of posts.")]
  MissingInput,

  #[error("Maximum 3 subreddits allowed")]
  TooManySubreddits { count: usize },

  #[error("Post limit must be between 1 and 1000")]
  PostLimitOutOfRange { value: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config file {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse config file {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("Invalid value for {key}: {message}")]
  InvalidValue { key: String, message: String },

  #[error("Could not determine a data directory; set THREADLENS_HOME")]
  NoDataDir,
}

impl ConfigError {
  pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidValue { key: key.into(), message: message.into() }
  }
}

#[derive(Error, Debug)]
pub enum StoreError {
  #[error("Transcript store I/O failed at {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Transcript at {path} is corrupt: {source}")]
  Corrupt {
    path: String,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ViewError {
  #[error("A search with the same filters is already running")]
  Busy,

  #[error("Intensity must be between 0 and 100, got {0}")]
  IntensityOutOfRange(u32),

  #[error("Page numbers start at 1")]
  InvalidPage,

  #[error("The {group} filter is not available on the {tab} tab")]
  GroupUnavailable { group: String, tab: String },

  #[error("Still waiting for the previous chat reply")]
  ReplyPending,

  #[error("No chat session with id {0}")]
  UnknownSession(i64),
}
