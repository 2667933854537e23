//! Chat with the insights backend
//!
//! [`panel::ChatPanel`] is the per-tab assistant that carries the tab's
//! filters as context, [`sessions::SessionManager`] drives the standalone
//! Ask-AI conversations, and [`transcript::TranscriptStore`] keeps panel
//! transcripts on disk between runs.

pub mod panel;
pub mod sessions;
pub mod transcript;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::FilterRequest;

pub use panel::{ChatPanel, PanelState};
pub use sessions::{ChatSession, SessionManager};
pub use transcript::TranscriptStore;

/// Bot text used when the chat endpoint fails or returns nothing usable
pub const APOLOGY: &str = "Sorry, I couldn't get an answer. Please try again.";

/// Placeholder content while a reply is in flight
pub const THINKING: &str = "Thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
  User,
  Bot,
  Loading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id: i64,
  #[serde(rename = "type")]
  pub kind: MessageKind,
  pub content: String,
}

impl ChatMessage {
  pub fn new(id: i64, kind: MessageKind, content: impl Into<String>) -> Self {
    Self { id, kind, content: content.into() }
  }
}

/// Body of a chat prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
  pub user_prompt: String,
  pub user_task: String,
  pub filters: Option<FilterRequest>,
}

/// Text extracted from a chat response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
  pub text: String,
}

impl ChatReply {
  const FIELDS: [&'static str; 4] = ["response", "summary", "message", "content"];

  /// First non-empty string among the known reply fields, in priority order
  pub fn from_value(value: &Value) -> Option<Self> {
    Self::FIELDS
      .iter()
      .filter_map(|field| value.get(field).and_then(Value::as_str))
      .find(|text| !text.trim().is_empty())
      .map(|text| Self { text: text.to_string() })
  }
}

/// Millisecond id strictly greater than every id already in `messages`
pub(crate) fn next_message_id(messages: &[ChatMessage]) -> i64 {
  let now = chrono::Utc::now().timestamp_millis();
  let last = messages.iter().map(|m| m.id).max().unwrap_or(i64::MIN);
  now.max(last.saturating_add(1))
}
