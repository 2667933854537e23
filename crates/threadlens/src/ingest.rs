//! Mapping of backend CSV exports onto rows
//!
//! The scraper and filter Lambdas hand back links to CSV files whose columns
//! hold raw classifier output: JSON score maps for emotions and topics, JSON
//! arrays for list-valued fields, and a creation timestamp. This module turns
//! those records into [`Row`]s for a given tab, or into
//! [`ScrapedComment`]s for the scraper panel.

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::{Detail, Emotion, PractitionerType, Row, Tab};
use crate::scraper::ScrapedComment;

/// Rows kept from each downloaded file
pub const MAX_ROWS_PER_FILE: usize = 10;

/// One record of a backend CSV file; unknown columns are ignored
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Record {
  id: Option<String>,
  author: Option<String>,
  subreddit: Option<String>,
  body: Option<String>,
  score: Option<String>,
  emotions: Option<String>,
  topics: Option<String>,
  created_utc: Option<String>,
  painpointsxfrustrations: Option<String>,
  failed_solutions: Option<String>,
  desire_and_wish: Option<String>,
  metaphors: Option<String>,
  practitioner_reference: Option<String>,
  trigger_phrase: Option<String>,
  question: Option<String>,
}

fn records(text: &str) -> Result<Vec<Record>, csv::Error> {
  let mut reader = ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(text.as_bytes());
  reader.deserialize().take(MAX_ROWS_PER_FILE).collect()
}

fn score_map(raw: Option<&str>) -> Option<Map<String, Value>> {
  let raw = raw?.trim();
  if raw.is_empty() {
    return None;
  }
  match serde_json::from_str::<Value>(raw).ok()? {
    Value::Object(map) => Some(map),
    _ => None,
  }
}

/// Label with the highest numeric score in a JSON object
pub fn top_label(raw: Option<&str>) -> Option<(String, f64)> {
  score_map(raw)?
    .into_iter()
    .filter_map(|(label, score)| score.as_f64().map(|s| (label, s)))
    .filter(|(_, score)| score.is_finite())
    .fold(None, |best: Option<(String, f64)>, (label, score)| match best {
      Some((_, best_score)) if best_score >= score => best,
      _ => Some((label, score)),
    })
}

/// Parse `created_utc` as RFC 3339, a naive UTC datetime, or epoch seconds
pub fn parse_created(raw: Option<&str>) -> Option<DateTime<Utc>> {
  let raw = raw?.trim();
  if raw.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
      return Some(naive.and_utc());
    }
  }
  let secs: f64 = raw.parse().ok()?;
  DateTime::from_timestamp(secs.trunc() as i64, 0)
}

fn plural(n: i64, unit: &str) -> String {
  if n > 1 {
    format!("{n} {unit}s ago")
  } else {
    format!("{n} {unit} ago")
  }
}

/// Display age and whole hours elapsed; unknown times sort last
pub fn relative_time(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> (String, u64) {
  let Some(created) = created else {
    return (String::new(), u64::MAX);
  };
  let hours = (now - created).num_hours().max(0);
  let display = match hours {
    0 => "just now".to_string(),
    h if h < 24 => plural(h, "hour"),
    h if h < 24 * 7 => plural(h / 24, "day"),
    h if h < 24 * 30 => plural(h / (24 * 7), "week"),
    h if h < 24 * 365 => plural(h / (24 * 30), "month"),
    h => plural(h / (24 * 365), "year"),
  };
  (display, hours as u64)
}

/// Practitioner named by the longest reference, or `unknown`
pub fn practitioner_type(raw: Option<&str>) -> PractitionerType {
  let value = raw.and_then(|r| serde_json::from_str::<Value>(r.trim()).ok());
  let reference_len =
    |v: &Value| v.get("practitioner_reference").and_then(Value::as_str).map_or(0, |s| s.chars().count());

  let chosen = match &value {
    Some(Value::Array(items)) => items.iter().fold(None, |best: Option<&Value>, item| match best {
      Some(b) if reference_len(item) <= reference_len(b) => Some(b),
      _ => Some(item),
    }),
    Some(obj @ Value::Object(_)) => Some(obj),
    _ => None,
  };

  chosen
    .and_then(|v| v.get("practitioner_type"))
    .and_then(Value::as_str)
    .and_then(|label| label.parse().ok())
    .unwrap_or(PractitionerType::Unknown)
}

/// JSON array cells become a comma-separated list, anything else passes through
pub fn join_list(raw: Option<&str>) -> String {
  let Some(raw) = raw else {
    return String::new();
  };
  match serde_json::from_str::<Value>(raw) {
    Ok(Value::Array(items)) => items
      .iter()
      .filter_map(|item| match item {
        Value::String(s) => (!s.is_empty()).then(|| s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
      })
      .collect::<Vec<_>>()
      .join(", "),
    _ => raw.to_string(),
  }
}

fn upvotes(raw: Option<&str>) -> u64 {
  raw.and_then(|s| s.trim().parse::<f64>().ok()).filter(|n| n.is_finite() && *n > 0.0).map_or(0, |n| n as u64)
}

fn detail_for(tab: Tab, record: &Record) -> Detail {
  let text = |field: &Option<String>| field.clone().unwrap_or_default();
  match tab {
    Tab::Painpoints => Detail::Painpoint { painpoint: text(&record.painpointsxfrustrations) },
    Tab::FailedSolutions => {
      Detail::FailedSolution { failed_solution: join_list(record.failed_solutions.as_deref()) }
    }
    Tab::DesiresWishes => Detail::DesireWish { desire_wish: text(&record.desire_and_wish) },
    Tab::Metaphors => Detail::Metaphor { metaphor_phrase: join_list(record.metaphors.as_deref()) },
    Tab::Practitioners => Detail::Practitioner {
      practitioner_type: practitioner_type(record.practitioner_reference.as_deref()),
    },
    Tab::Triggers => Detail::Trigger { trigger_phrase: text(&record.trigger_phrase) },
    Tab::Questions => Detail::Question { question: text(&record.question) },
  }
}

fn to_row(tab: Tab, index: usize, record: Record, now: DateTime<Utc>) -> Row {
  let emotion = top_label(record.emotions.as_deref());
  let intensity = emotion.as_ref().map_or(0.0, |(_, score)| score.clamp(0.0, 1.0));
  let emotion = emotion.and_then(|(label, _)| label.parse().ok()).unwrap_or(Emotion::Neutral);
  let topic = top_label(record.topics.as_deref()).map(|(label, _)| label).unwrap_or_default();
  let (timestamp, timestamp_sort) = relative_time(parse_created(record.created_utc.as_deref()), now);
  let detail = detail_for(tab, &record);

  Row {
    id: record.id.filter(|id| !id.is_empty()).unwrap_or_else(|| index.to_string()),
    author: record.author.unwrap_or_default(),
    subreddit: record.subreddit.unwrap_or_default(),
    comment: record.body.unwrap_or_default(),
    upvotes: upvotes(record.score.as_deref()),
    emotion,
    intensity,
    topic,
    timestamp,
    timestamp_sort,
    detail,
  }
}

/// Rows of `tab` from a CSV file, relative to `now`
pub fn rows_from_csv_at(tab: Tab, text: &str, now: DateTime<Utc>) -> Result<Vec<Row>, csv::Error> {
  Ok(records(text)?.into_iter().enumerate().map(|(i, record)| to_row(tab, i, record, now)).collect())
}

pub fn rows_from_csv(tab: Tab, text: &str) -> Result<Vec<Row>, csv::Error> {
  rows_from_csv_at(tab, text, Utc::now())
}

/// Scraped comments from a CSV file
pub fn comments_from_csv_at(text: &str, now: DateTime<Utc>) -> Result<Vec<ScrapedComment>, csv::Error> {
  let comments = records(text)?
    .into_iter()
    .enumerate()
    .map(|(index, record)| {
      let (timestamp, _) = relative_time(parse_created(record.created_utc.as_deref()), now);
      ScrapedComment {
        id: record.id.filter(|id| !id.is_empty()).unwrap_or_else(|| index.to_string()),
        author: record.author.unwrap_or_default(),
        subreddit: record.subreddit.unwrap_or_default(),
        comment: record.body.unwrap_or_default(),
        upvotes: upvotes(record.score.as_deref()),
        emotion: top_label(record.emotions.as_deref()).map(|(label, _)| label),
        timestamp,
      }
    })
    .collect();
  Ok(comments)
}

pub fn comments_from_csv(text: &str) -> Result<Vec<ScrapedComment>, csv::Error> {
  comments_from_csv_at(text, Utc::now())
}
