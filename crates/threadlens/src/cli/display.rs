//! Display formatting utilities for CLI output

use colored::*;

use crate::chat::sessions::ChatSession;
use crate::chat::{ChatMessage, MessageKind};
use crate::model::{Row, Tab};
use crate::pagination::{Page, PageToken};
use crate::scraper::ScrapedComment;
use crate::search::Source;

const WRAP_WIDTH: usize = 80;

/// Wrap text to fit within a specified width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current = String::new();
    for word in paragraph.split_whitespace() {
      if current.is_empty() {
        current = word.to_string();
      } else if current.chars().count() + 1 + word.chars().count() <= width {
        current.push(' ');
        current.push_str(word);
      } else {
        lines.push(std::mem::take(&mut current));
        current = word.to_string();
      }
    }
    if !current.is_empty() {
      lines.push(current);
    }
  }

  lines
}

/// Shorten to `max` characters with a trailing ellipsis
pub fn truncate(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    return text.to_string();
  }
  let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
  short.push('…');
  short
}

/// Note shown when results came from the bundled samples
pub fn print_source(source: &Source) {
  if let Source::Fallback { reason } = source {
    println!("{} Backend unavailable, showing sample data ({})", "⚠".yellow(), reason.dimmed());
  }
}

fn print_row(tab: Tab, row: &Row) {
  println!(
    "{} {} {} {}",
    row.author.cyan().bold(),
    row.subreddit.blue(),
    row.timestamp.dimmed(),
    format!("▲{}", row.upvotes).green()
  );
  println!(
    "  {} {} ({:.0}%)  {} {}  {}",
    "emotion:".dimmed(),
    format!("{} {}", row.emotion.emoji(), row.emotion).magenta(),
    row.intensity * 100.0,
    "topic:".dimmed(),
    row.topic,
    format!("{}: {}", tab.detail_label(), truncate(row.detail.text(), 60)).yellow()
  );
  for line in wrap_text(&row.comment, WRAP_WIDTH - 2) {
    println!("  {line}");
  }
  println!();
}

fn render_window(window: &[PageToken], current: usize) -> String {
  window
    .iter()
    .map(|token| match token {
      PageToken::Page(n) if *n == current => format!("[{n}]").bold().to_string(),
      other => other.to_string(),
    })
    .collect::<Vec<_>>()
    .join(" ")
}

pub fn print_page(tab: Tab, page: &Page<Row>, window: &[PageToken]) {
  println!("{} {}\n", "==".blue(), tab.title().blue().bold());

  if page.rows.is_empty() {
    println!("No results");
    return;
  }

  for row in &page.rows {
    print_row(tab, row);
  }
  println!(
    "Showing {}-{} of {}   Page {}",
    page.range_start,
    page.range_end,
    page.total,
    render_window(window, page.current_page)
  );
}

pub fn print_messages(messages: &[ChatMessage]) {
  if messages.is_empty() {
    println!("No messages yet.");
    return;
  }
  for message in messages {
    print_message(message);
  }
}

pub fn print_message(message: &ChatMessage) {
  let label = match message.kind {
    MessageKind::User => "you".cyan().bold(),
    MessageKind::Bot => " ai".green().bold(),
    MessageKind::Loading => "  …".dimmed(),
  };
  let mut lines = wrap_text(&message.content, WRAP_WIDTH - 5).into_iter();
  println!("{}: {}", label, lines.next().unwrap_or_default());
  for line in lines {
    println!("     {line}");
  }
}

pub fn print_sessions(sessions: &[ChatSession], active: Option<i64>) {
  for session in sessions {
    let marker = if Some(session.id) == active { "▶".green() } else { " ".normal() };
    println!(
      "{} {} {} {}",
      marker,
      session.id.to_string().dimmed(),
      session.title.bold(),
      format!("({} messages)", session.messages.len()).dimmed()
    );
  }
}

pub fn print_comments(comments: &[ScrapedComment]) {
  if comments.is_empty() {
    println!("No comments");
    return;
  }
  for comment in comments {
    let emotion = comment.emotion.as_deref().unwrap_or("unlabelled");
    println!(
      "{} {} {} {} {}",
      comment.author.cyan().bold(),
      format!("r/{}", comment.subreddit.trim_start_matches("r/")).blue(),
      comment.timestamp.dimmed(),
      format!("▲{}", comment.upvotes).green(),
      emotion.magenta()
    );
    for line in wrap_text(&comment.comment, WRAP_WIDTH - 2) {
      println!("  {line}");
    }
    println!();
  }
  println!("{} comments", comments.len());
}
