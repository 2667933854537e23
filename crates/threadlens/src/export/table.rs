//! Local CSV rendering of a tab's filtered rows
//!
//! Every data cell is quoted with inner quotes doubled, records are joined by
//! `\n` without a trailing terminator. Header text and column order differ per
//! tab and are kept exactly as the dashboard downloads them.

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::model::{Row, Tab};

pub fn header(tab: Tab) -> &'static [&'static str] {
  match tab {
    Tab::Painpoints => &[
      "Author", "Timestamp", "Subreddit", "Comment", "Emotion", "Upvotes", "Intensity", "Painpoint",
      "Topic",
    ],
    Tab::FailedSolutions => &[
      "Author",
      "Timestamp",
      "Subreddit",
      "Comment",
      "FailedSolution",
      "Emotion",
      "Upvotes",
      "Intensity",
      "Summary",
      "Topic",
    ],
    Tab::DesiresWishes => &[
      "Author", "Timestamp", "Subreddit", "Comment", "Upvotes", "Topic", "Intensity", "Desires/Wish",
    ],
    Tab::Metaphors => &[
      "Author",
      "timestamp",
      "Subreddit",
      "Metaphor Phrase",
      "Emotion",
      "Intensity Score",
      "Upvotes",
      "Comment",
      "Topic",
    ],
    Tab::Practitioners => &[
      "Author",
      "Subreddit",
      "Comment",
      "Topic",
      "Votes",
      "Emotion",
      "Time",
      "Practitioner Type",
      "Intensity",
      "Topic",
    ],
    Tab::Triggers => &[
      "Author", "Timestamp", "Subreddit", "Comment", "TriggerPhrase", "Emotion", "Upvotes", "Intensity",
      "Topic",
    ],
    Tab::Questions => &[
      "Author", "Timestamp", "Subreddit", "Comment", "Question", "Emotion", "Upvotes", "Intensity",
      "Topic",
    ],
  }
}

/// Only the practitioner export quotes its header cells
fn header_style(tab: Tab) -> QuoteStyle {
  match tab {
    Tab::Practitioners => QuoteStyle::Always,
    _ => QuoteStyle::Necessary,
  }
}

fn cells(tab: Tab, r: &Row) -> Vec<String> {
  let detail = r.detail.text().to_string();
  let fixed = format!("{:.2}", r.intensity);
  let upvotes = r.upvotes.to_string();
  let emotion = r.emotion.as_str().to_string();

  match tab {
    Tab::Painpoints => vec![
      r.author.clone(),
      r.timestamp.clone(),
      r.subreddit.clone(),
      r.comment.clone(),
      emotion,
      upvotes,
      fixed,
      detail,
      r.topic.clone(),
    ],
    Tab::FailedSolutions => vec![
      r.author.clone(),
      r.timestamp.clone(),
      r.subreddit.clone(),
      r.comment.clone(),
      detail,
      emotion,
      upvotes,
      fixed,
      String::new(),
      r.topic.clone(),
    ],
    Tab::DesiresWishes => vec![
      r.author.clone(),
      r.timestamp.clone(),
      r.subreddit.clone(),
      r.comment.clone(),
      upvotes,
      r.topic.clone(),
      format!("{}%", (r.intensity * 100.0).round()),
      detail,
    ],
    Tab::Metaphors => vec![
      r.author.clone(),
      r.timestamp.clone(),
      r.subreddit.clone(),
      detail,
      emotion,
      fixed,
      upvotes,
      r.comment.clone(),
      r.topic.clone(),
    ],
    Tab::Practitioners => vec![
      r.author.clone(),
      r.subreddit.clone(),
      r.comment.clone(),
      r.topic.clone(),
      upvotes,
      emotion,
      r.timestamp.clone(),
      detail,
      format!("{:.1}%", r.intensity * 100.0),
      r.topic.clone(),
    ],
    Tab::Triggers | Tab::Questions => vec![
      r.author.clone(),
      r.timestamp.clone(),
      r.subreddit.clone(),
      r.comment.clone(),
      detail,
      emotion,
      upvotes,
      fixed,
      r.topic.clone(),
    ],
  }
}

fn csv_writer(body: &mut Vec<u8>, style: QuoteStyle) -> csv::Writer<&mut Vec<u8>> {
  WriterBuilder::new()
    .has_headers(false)
    .quote_style(style)
    .terminator(Terminator::Any(b'\n'))
    .from_writer(body)
}

/// Render `rows` as the tab's CSV download
pub fn render(tab: Tab, rows: &[Row]) -> Result<String> {
  let mut body = Vec::new();
  {
    let mut writer = csv_writer(&mut body, header_style(tab));
    writer.write_record(header(tab)).context("Failed to encode CSV header")?;
    writer.flush().context("Failed to flush CSV writer")?;
  }
  {
    let mut writer = csv_writer(&mut body, QuoteStyle::Always);
    for row in rows {
      writer
        .write_record(cells(tab, row))
        .with_context(|| format!("Failed to encode row {} as CSV", row.id))?;
    }
    writer.flush().context("Failed to flush CSV writer")?;
  }
  let body = String::from_utf8(body).context("CSV output is not valid UTF-8")?;

  // An empty practitioner download is the bare header; the others keep its terminator
  if rows.is_empty() && tab != Tab::Practitioners {
    return Ok(body);
  }
  Ok(body.strip_suffix('\n').unwrap_or(&body).to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::samples;

  #[test]
  fn test_header_matches_column_count() {
    for tab in Tab::ALL {
      let row = &samples::rows(tab)[0];
      assert_eq!(header(tab).len(), cells(tab, row).len(), "{tab}");
    }
  }

  #[test]
  fn test_fields_are_quoted_and_inner_quotes_doubled() {
    let mut row = samples::rows(Tab::Questions)[0].clone();
    row.comment = "she said \"no\", twice".into();
    row.intensity = 0.5;
    let csv = render(Tab::Questions, &[row]).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
      lines.next().unwrap(),
      "Author,Timestamp,Subreddit,Comment,Question,Emotion,Upvotes,Intensity,Topic"
    );
    let record = lines.next().unwrap();
    assert!(record.contains(r#""she said ""no"", twice""#));
    assert!(record.contains(r#""0.50""#));
    assert!(!csv.ends_with('\n'));
  }

  #[test]
  fn test_intensity_formats_differ_per_tab() {
    let mut row = samples::rows(Tab::DesiresWishes)[0].clone();
    row.intensity = 0.856;
    let csv = render(Tab::DesiresWishes, std::slice::from_ref(&row)).unwrap();
    assert!(csv.contains(r#""86%""#));

    let mut row = samples::rows(Tab::Practitioners)[0].clone();
    row.intensity = 0.856;
    let csv = render(Tab::Practitioners, &[row]).unwrap();
    assert!(csv.starts_with(r#""Author","Subreddit","Comment","Topic","Votes""#));
    assert!(csv.contains(r#""85.6%""#));
  }

  #[test]
  fn test_failed_solutions_summary_cell_is_empty() {
    let row = samples::rows(Tab::FailedSolutions)[0].clone();
    let csv = render(Tab::FailedSolutions, &[row.clone()]).unwrap();
    let expected_tail = format!(r#","{:.2}","","{}""#, row.intensity, row.topic);
    assert!(csv.ends_with(&expected_tail));
  }

  #[test]
  fn test_empty_export_keeps_header() {
    assert_eq!(
      render(Tab::Painpoints, &[]).unwrap(),
      "Author,Timestamp,Subreddit,Comment,Emotion,Upvotes,Intensity,Painpoint,Topic\n"
    );
    assert_eq!(
      render(Tab::Practitioners, &[]).unwrap(),
      r#""Author","Subreddit","Comment","Topic","Votes","Emotion","Time","Practitioner Type","Intensity","Topic""#
    );
    assert!(render(Tab::Metaphors, &[]).unwrap().starts_with("Author,timestamp,Subreddit,Metaphor Phrase,"));
  }
}
