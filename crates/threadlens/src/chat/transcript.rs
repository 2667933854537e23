//! On-disk chat transcripts, one JSON file per key

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::ChatMessage;
use crate::error::StoreError;
use crate::model::Tab;

#[derive(Debug, Clone)]
pub struct TranscriptStore {
  root: PathBuf,
}

impl TranscriptStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Storage key of a tab's panel transcript
  pub fn key_for(tab: Tab) -> String {
    format!("chat-{}", tab.data_type())
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn path_for(&self, key: &str) -> PathBuf {
    self.root.join(format!("{key}.json"))
  }

  /// Messages saved under `key`; an absent file is an empty transcript
  pub fn load(&self, key: &str) -> Result<Vec<ChatMessage>, StoreError> {
    let path = self.path_for(key);
    if !path.exists() {
      return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)
      .map_err(|source| StoreError::Io { path: path.display().to_string(), source })?;
    serde_json::from_str(content.trim())
      .map_err(|source| StoreError::Corrupt { path: path.display().to_string(), source })
  }

  /// Like [`load`](Self::load) but starts over when the file is unreadable
  pub fn load_or_default(&self, key: &str) -> Vec<ChatMessage> {
    self.load(key).unwrap_or_else(|e| {
      warn!("Ignoring saved transcript: {}", e);
      Vec::new()
    })
  }

  /// Replace the transcript under `key`. The file is written to a temporary
  /// sibling and renamed, so readers see either the old or the new contents.
  pub fn save(&self, key: &str, messages: &[ChatMessage]) -> Result<(), StoreError> {
    let path = self.path_for(key);
    let io_err = |source| StoreError::Io { path: path.display().to_string(), source };

    fs::create_dir_all(&self.root).map_err(io_err)?;
    let content = serde_json::to_string_pretty(messages)
      .map_err(|source| StoreError::Corrupt { path: path.display().to_string(), source })?;

    let mut file = NamedTempFile::new_in(&self.root).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.persist(&path).map_err(|e| io_err(e.error))?;

    debug!("Saved {} chat messages to {}", messages.len(), path.display());
    Ok(())
  }

  pub fn clear(&self, key: &str) -> Result<(), StoreError> {
    let path = self.path_for(key);
    match fs::remove_file(&path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(source) => Err(StoreError::Io { path: path.display().to_string(), source }),
    }
  }
}
