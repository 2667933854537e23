//! Per-tab chat panel
//!
//! The panel moves between three states: hidden, a collapsed input bar, and
//! the full transcript. Showing takes effect at once. Hiding clears the
//! visibility flag first and only changes state once [`EXIT_ANIMATION`] has
//! elapsed, which callers observe by advancing the clock with
//! [`ChatPanel::tick`].

use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::{next_message_id, ChatMessage, ChatReply, ChatRequest, MessageKind, APOLOGY, THINKING};
use crate::client::Backend;
use crate::error::{BackendError, ViewError};
use crate::filter::FilterRequest;
use crate::model::Tab;

pub const EXIT_ANIMATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
  Hidden,
  InputBar,
  FullChat,
}

/// A reply the panel is waiting for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
  pub loading_id: i64,
  pub prompt: String,
}

#[derive(Debug)]
pub struct ChatPanel {
  tab: Tab,
  state: PanelState,
  bar_visible: bool,
  panel_visible: bool,
  scheduled: Option<(PanelState, Instant)>,
  messages: Vec<ChatMessage>,
}

impl ChatPanel {
  pub fn new(tab: Tab) -> Self {
    Self::with_messages(tab, Vec::new())
  }

  /// Restore a saved transcript. Placeholders left by an interrupted run
  /// can never be answered, so they are dropped.
  pub fn with_messages(tab: Tab, mut messages: Vec<ChatMessage>) -> Self {
    messages.retain(|m| m.kind != MessageKind::Loading);
    Self {
      tab,
      state: PanelState::Hidden,
      bar_visible: false,
      panel_visible: false,
      scheduled: None,
      messages,
    }
  }

  pub fn tab(&self) -> Tab {
    self.tab
  }

  pub fn state(&self) -> PanelState {
    self.state
  }

  pub fn is_bar_visible(&self) -> bool {
    self.bar_visible
  }

  pub fn is_panel_visible(&self) -> bool {
    self.panel_visible
  }

  pub fn messages(&self) -> &[ChatMessage] {
    &self.messages
  }

  pub fn is_waiting(&self) -> bool {
    self.messages.iter().any(|m| m.kind == MessageKind::Loading)
  }

  /// Open the input bar when hidden, otherwise start closing it
  pub fn toggle_bar(&mut self, now: Instant) {
    if self.state == PanelState::Hidden {
      self.state = PanelState::InputBar;
      self.bar_visible = true;
      self.scheduled = None;
    } else {
      self.close_bar(now);
    }
  }

  pub fn close_bar(&mut self, now: Instant) {
    self.bar_visible = false;
    self.scheduled = Some((PanelState::Hidden, now + EXIT_ANIMATION));
  }

  /// Collapse the full transcript back to the input bar
  pub fn minimize(&mut self, now: Instant) {
    if self.state != PanelState::FullChat {
      return;
    }
    self.panel_visible = false;
    self.scheduled = Some((PanelState::InputBar, now + EXIT_ANIMATION));
  }

  /// Apply a scheduled transition whose deadline has passed
  pub fn tick(&mut self, now: Instant) -> bool {
    match self.scheduled {
      Some((target, deadline)) if now >= deadline => {
        self.state = target;
        self.scheduled = None;
        true
      }
      _ => false,
    }
  }

  /// Append the user's prompt and a loading placeholder. Blank input is
  /// ignored and returns `Ok(None)`.
  pub fn begin_send(&mut self, text: &str) -> Result<Option<PendingReply>, ViewError> {
    let prompt = text.trim();
    if prompt.is_empty() {
      return Ok(None);
    }
    if self.is_waiting() {
      return Err(ViewError::ReplyPending);
    }

    let user_id = next_message_id(&self.messages);
    self.messages.push(ChatMessage::new(user_id, MessageKind::User, prompt));
    let loading_id = next_message_id(&self.messages);
    self.messages.push(ChatMessage::new(loading_id, MessageKind::Loading, THINKING));

    self.state = PanelState::FullChat;
    self.bar_visible = true;
    self.panel_visible = true;
    self.scheduled = None;

    Ok(Some(PendingReply { loading_id, prompt: prompt.to_string() }))
  }

  /// Replace the placeholder in place with the reply, or the apology on failure
  pub fn complete(
    &mut self,
    pending: &PendingReply,
    outcome: Result<ChatReply, BackendError>,
  ) -> Option<&ChatMessage> {
    let content = match outcome {
      Ok(reply) => reply.text,
      Err(e) => {
        warn!("Chat request for {} failed: {}", self.tab, e);
        APOLOGY.to_string()
      }
    };

    let slot = self
      .messages
      .iter_mut()
      .find(|m| m.id == pending.loading_id && m.kind == MessageKind::Loading)?;
    slot.kind = MessageKind::Bot;
    slot.content = content;
    Some(slot)
  }

  /// Send a prompt and wait for the reply. `task` defaults to the tab's
  /// summary task and `filters` is the tab's current filter state.
  pub async fn send(
    &mut self,
    backend: &dyn Backend,
    text: &str,
    task: Option<&str>,
    filters: FilterRequest,
  ) -> Result<Option<ChatMessage>, ViewError> {
    let Some(pending) = self.begin_send(text)? else {
      return Ok(None);
    };

    let request = ChatRequest {
      user_prompt: pending.prompt.clone(),
      user_task: task.unwrap_or(self.tab.default_chat_task()).to_string(),
      filters: Some(filters),
    };
    debug!("Sending chat prompt for {}", self.tab);
    let outcome = backend.chat(&request).await;
    Ok(self.complete(&pending, outcome).cloned())
  }

  pub fn clear(&mut self) {
    self.messages.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn reply(text: &str) -> Result<ChatReply, BackendError> {
    Ok(ChatReply { text: text.to_string() })
  }

  #[test]
  fn test_showing_is_immediate_and_hiding_is_deferred() {
    let start = Instant::now();
    let mut panel = ChatPanel::new(Tab::Painpoints);

    panel.toggle_bar(start);
    assert_eq!(panel.state(), PanelState::InputBar);
    assert!(panel.is_bar_visible());

    panel.toggle_bar(start);
    assert!(!panel.is_bar_visible());
    assert_eq!(panel.state(), PanelState::InputBar);

    assert!(!panel.tick(start + Duration::from_millis(299)));
    assert_eq!(panel.state(), PanelState::InputBar);
    assert!(panel.tick(start + EXIT_ANIMATION));
    assert_eq!(panel.state(), PanelState::Hidden);
  }

  #[test]
  fn test_minimize_returns_to_input_bar() {
    let start = Instant::now();
    let mut panel = ChatPanel::new(Tab::Triggers);
    panel.begin_send("why?").unwrap();
    assert_eq!(panel.state(), PanelState::FullChat);

    panel.minimize(start);
    assert!(!panel.is_panel_visible());
    panel.tick(start + EXIT_ANIMATION);
    assert_eq!(panel.state(), PanelState::InputBar);
  }

  #[test]
  fn test_blank_prompt_is_a_no_op() {
    let mut panel = ChatPanel::new(Tab::Questions);
    assert_eq!(panel.begin_send("   ").unwrap(), None);
    assert!(panel.messages().is_empty());
    assert_eq!(panel.state(), PanelState::Hidden);
  }

  #[test]
  fn test_send_appends_user_and_loading_rows() {
    let mut panel = ChatPanel::new(Tab::Metaphors);
    let pending = panel.begin_send(" hello ").unwrap().unwrap();
    let kinds: Vec<_> = panel.messages().iter().map(|m| m.kind).collect();
    assert_eq!(kinds, vec![MessageKind::User, MessageKind::Loading]);
    assert_eq!(panel.messages()[0].content, "hello");
    assert_eq!(pending.loading_id, panel.messages()[1].id);
  }

  #[test]
  fn test_second_send_while_waiting_is_rejected() {
    let mut panel = ChatPanel::new(Tab::Metaphors);
    panel.begin_send("first").unwrap();
    assert_eq!(panel.begin_send("second"), Err(ViewError::ReplyPending));
    assert_eq!(panel.messages().len(), 2);
  }

  #[test]
  fn test_reply_replaces_placeholder_in_place() {
    let mut panel = ChatPanel::new(Tab::Painpoints);
    let first = panel.begin_send("one").unwrap().unwrap();
    panel.complete(&first, reply("answer one"));
    let second = panel.begin_send("two").unwrap().unwrap();
    panel.complete(&second, Err(BackendError::timeout("/ai/chat", 30)));

    let contents: Vec<_> = panel.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "answer one", "two", APOLOGY]);
    assert!(panel.messages().iter().all(|m| m.kind != MessageKind::Loading));
    assert!(!panel.is_waiting());
  }

  #[test]
  fn test_restored_transcript_drops_placeholders() {
    let messages = vec![
      ChatMessage::new(1, MessageKind::User, "q"),
      ChatMessage::new(2, MessageKind::Loading, THINKING),
    ];
    let panel = ChatPanel::with_messages(Tab::Painpoints, messages);
    assert_eq!(panel.messages().len(), 1);
    assert!(!panel.is_waiting());
  }
}
