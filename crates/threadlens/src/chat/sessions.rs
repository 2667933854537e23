//! Standalone Ask-AI conversations stored by the backend

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{next_message_id, ChatMessage, ChatRequest, MessageKind, THINKING};
use crate::client::Backend;
use crate::error::{BackendError, ViewError};

pub const NEW_CHAT_TITLE: &str = "New Chat";
pub const GENERAL_TASK: &str = "general_query";

const TITLE_CHARS: usize = 25;
const NO_ANSWER: &str = "I couldn't generate a response. Please try again.";
const UNREACHABLE: &str = "Sorry, I'm having trouble connecting to the AI service. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
  pub id: i64,
  pub title: String,
  #[serde(default)]
  pub messages: Vec<ChatMessage>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
}

impl ChatSession {
  pub fn new(id: i64) -> Self {
    Self { id, title: NEW_CHAT_TITLE.to_string(), messages: Vec::new(), created_at: None }
  }
}

/// Title derived from the first message of a conversation
pub fn title_for(messages: &[ChatMessage]) -> Option<String> {
  let first = messages.first()?;
  let mut title: String = first.content.chars().take(TITLE_CHARS).collect();
  if first.content.chars().count() > TITLE_CHARS {
    title.push_str("...");
  }
  Some(title)
}

/// Prompt text with selected tags placed ahead of the typed message
pub fn compose_prompt(tags: &[String], text: &str) -> String {
  tags
    .iter()
    .map(String::as_str)
    .chain(std::iter::once(text))
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// The Ask-AI sidebar: every session plus the one being viewed
#[derive(Debug, Default)]
pub struct SessionManager {
  sessions: Vec<ChatSession>,
  active: Option<i64>,
}

impl SessionManager {
  /// Fetch the session list, starting a fresh session when the backend has
  /// none or can't be reached
  pub async fn load(backend: &dyn Backend) -> Self {
    let mut manager = Self::default();
    match backend.list_sessions().await {
      Ok(sessions) if !sessions.is_empty() => {
        manager.active = sessions.first().map(|s| s.id);
        manager.sessions = sessions;
      }
      Ok(_) => {
        manager.new_session();
      }
      Err(e) => {
        warn!("Failed to load chat history, starting a new chat: {}", e);
        manager.new_session();
      }
    }
    manager
  }

  pub fn sessions(&self) -> &[ChatSession] {
    &self.sessions
  }

  pub fn active(&self) -> Option<&ChatSession> {
    self.active.and_then(|id| self.get(id))
  }

  pub fn get(&self, id: i64) -> Option<&ChatSession> {
    self.sessions.iter().find(|s| s.id == id)
  }

  pub fn select(&mut self, id: i64) -> Result<(), ViewError> {
    self.get(id).ok_or(ViewError::UnknownSession(id))?;
    self.active = Some(id);
    Ok(())
  }

  /// Insert an empty session at the top of the list and make it active
  pub fn new_session(&mut self) -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut id = self.sessions.iter().map(|s| s.id.saturating_add(1)).fold(now, i64::max);
    // Backend ids can sit at the top of the range
    while self.get(id).is_some() {
      id = id.saturating_sub(1);
    }
    self.sessions.insert(0, ChatSession::new(id));
    self.active = Some(id);
    id
  }

  /// Send a prompt in session `id` and persist the updated conversation.
  /// Returns the bot message, or `None` when the prompt was blank.
  pub async fn send(
    &mut self,
    backend: &dyn Backend,
    id: i64,
    text: &str,
    tags: &[String],
  ) -> Result<Option<ChatMessage>, ViewError> {
    let prompt = compose_prompt(tags, text);
    if prompt.trim().is_empty() {
      return Ok(None);
    }

    let session = self.sessions.iter_mut().find(|s| s.id == id).ok_or(ViewError::UnknownSession(id))?;
    if session.messages.iter().any(|m| m.kind == MessageKind::Loading) {
      return Err(ViewError::ReplyPending);
    }

    let user_id = next_message_id(&session.messages);
    session.messages.push(ChatMessage::new(user_id, MessageKind::User, prompt.clone()));
    let loading_id = next_message_id(&session.messages);
    session.messages.push(ChatMessage::new(loading_id, MessageKind::Loading, THINKING));

    let request = ChatRequest {
      user_prompt: prompt,
      user_task: tags.first().cloned().unwrap_or_else(|| GENERAL_TASK.to_string()),
      filters: None,
    };
    let content = match backend.chat(&request).await {
      Ok(reply) => reply.text,
      Err(BackendError::Schema { .. }) => NO_ANSWER.to_string(),
      Err(e) => {
        warn!("Ask-AI request failed: {}", e);
        UNREACHABLE.to_string()
      }
    };

    let reply = ChatMessage::new(loading_id, MessageKind::Bot, content);
    if let Some(slot) = session.messages.iter_mut().find(|m| m.id == loading_id) {
      *slot = reply.clone();
    }
    if let Some(title) = title_for(&session.messages) {
      session.title = title;
    }

    if let Err(e) = backend.save_session(session).await {
      warn!("Failed to save chat {}: {}", id, e);
    } else {
      debug!("Saved chat {}", id);
    }
    Ok(Some(reply))
  }

  /// Remove a session locally, then ask the backend to forget it.
  /// The local removal stands even when the backend call fails.
  pub async fn delete(&mut self, backend: &dyn Backend, id: i64) -> Result<(), ViewError> {
    let before = self.sessions.len();
    self.sessions.retain(|s| s.id != id);
    if self.sessions.len() == before {
      return Err(ViewError::UnknownSession(id));
    }
    if self.active == Some(id) {
      self.active = self.sessions.first().map(|s| s.id);
    }

    if let Err(e) = backend.delete_session(id).await {
      warn!("Failed to delete chat {} from backend: {}", id, e);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_title_truncates_long_first_message() {
    let long = ChatMessage::new(1, MessageKind::User, "How do people describe their insomnia at night?");
    assert_eq!(title_for(&[long]).unwrap(), "How do people describe th...");

    let short = ChatMessage::new(1, MessageKind::User, "Hello there");
    assert_eq!(title_for(&[short]).unwrap(), "Hello there");
    assert_eq!(title_for(&[]), None);
  }

  #[test]
  fn test_compose_prompt_prefixes_tags() {
    let tags = vec!["summarize".to_string()];
    assert_eq!(compose_prompt(&tags, "sleep issues"), "summarize\n\nsleep issues");
    assert_eq!(compose_prompt(&[], "plain"), "plain");
    assert_eq!(compose_prompt(&tags, ""), "summarize");
  }

  #[test]
  fn test_new_session_is_active_and_first() {
    let mut manager = SessionManager::default();
    let first = manager.new_session();
    let second = manager.new_session();
    assert!(second > first);
    assert_eq!(manager.sessions()[0].id, second);
    assert_eq!(manager.active().unwrap().title, NEW_CHAT_TITLE);
  }

  #[test]
  fn test_new_session_after_largest_id_stays_unique() {
    let mut manager = SessionManager { sessions: vec![ChatSession::new(i64::MAX)], active: Some(i64::MAX) };
    let id = manager.new_session();
    assert_ne!(id, i64::MAX);
    assert_eq!(manager.sessions().len(), 2);
    assert_eq!(manager.active().unwrap().id, id);
    assert!(manager.get(i64::MAX).is_some());
  }

  #[test]
  fn test_select_unknown_session_fails() {
    let mut manager = SessionManager::default();
    assert_eq!(manager.select(42), Err(ViewError::UnknownSession(42)));
  }
}
