//! Backend search with local fallback
//!
//! A search never fails from the caller's point of view: transport errors,
//! bad statuses and responses that don't fit the row schema all fall back to
//! evaluating the same filters over the tab's bundled sample rows.

use futures::future::join_all;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};

use crate::client::Backend;
use crate::error::BackendError;
use crate::filter::{FilterRequest, FilterState};
use crate::ingest;
use crate::model::{Row, Tab};
use crate::samples;

/// Accepted shapes of a `/get_filtered_cmts` response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
  Wrapped { results: Vec<Row> },
  Files { urls: Vec<String> },
  Bare(Vec<Row>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
  Backend,
  Fallback { reason: String },
}

impl fmt::Display for Source {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Source::Backend => f.write_str("backend"),
      Source::Fallback { .. } => f.write_str("sample data"),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
  pub rows: Vec<Row>,
  pub source: Source,
}

impl SearchResult {
  pub fn is_fallback(&self) -> bool {
    matches!(self.source, Source::Fallback { .. })
  }
}

/// Evaluate `filters` locally over the tab's sample rows
pub fn fallback(tab: Tab, filters: &FilterState) -> Vec<Row> {
  filters.apply(samples::rows(tab))
}

/// Run a search for `tab`, falling back to sample data on any backend failure
pub async fn run_search(backend: &dyn Backend, tab: Tab, filters: &FilterState) -> SearchResult {
  let request = filters.to_request(tab);
  match fetch_rows(backend, tab, &request).await {
    Ok(rows) => {
      debug!("Backend returned {} {} rows", rows.len(), tab);
      SearchResult { rows, source: Source::Backend }
    }
    Err(e) => {
      warn!("Search for {} fell back to sample data: {}", tab, e);
      SearchResult { rows: fallback(tab, filters), source: Source::Fallback { reason: e.to_string() } }
    }
  }
}

async fn fetch_rows(backend: &dyn Backend, tab: Tab, request: &FilterRequest) -> Result<Vec<Row>, BackendError> {
  let rows = match backend.filtered_comments(request).await? {
    SearchResponse::Wrapped { results } | SearchResponse::Bare(results) => results,
    SearchResponse::Files { urls } => rows_from_files(backend, tab, &urls).await?,
  };
  validate(tab, &rows)?;
  Ok(rows)
}

/// Download every CSV file concurrently and ingest them in listed order.
/// Individual files may fail; all of them failing is a backend failure.
async fn rows_from_files(backend: &dyn Backend, tab: Tab, urls: &[String]) -> Result<Vec<Row>, BackendError> {
  let bodies = join_all(urls.iter().map(|url| backend.fetch_file(url))).await;

  let mut rows = Vec::new();
  let mut failures = 0;
  for (url, body) in urls.iter().zip(bodies) {
    let parsed = match body {
      Ok(text) => ingest::rows_from_csv(tab, &text).map_err(|e| BackendError::schema(url, e.to_string())),
      Err(e) => Err(e),
    };
    match parsed {
      Ok(mut batch) => rows.append(&mut batch),
      Err(e) => {
        warn!("Skipping result file: {}", e);
        failures += 1;
      }
    }
  }

  if !urls.is_empty() && failures == urls.len() {
    return Err(BackendError::schema("/get_filtered_cmts", "none of the result files could be read"));
  }
  Ok(rows)
}

fn validate(tab: Tab, rows: &[Row]) -> Result<(), BackendError> {
  for row in rows {
    if row.tab() != tab {
      return Err(BackendError::schema(
        "/get_filtered_cmts",
        format!("row {} is a {} row, expected {}", row.id, row.tab(), tab),
      ));
    }
    row.validate().map_err(|message| BackendError::schema("/get_filtered_cmts", message))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::filter::FilterGroup;

  #[test]
  fn test_sleep_keyword_fallback_finds_chronic_pain_row() {
    let mut filters = FilterState::new();
    filters.keyword = "sleep".into();
    let rows = fallback(Tab::Painpoints, &filters);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].author, "u/chronic_sufferer");
  }

  #[test]
  fn test_fallback_applies_groups() {
    let mut filters = FilterState::new();
    filters.set_intensity_pct(0).unwrap();
    filters.toggle(FilterGroup::Subreddit, "r/wellness");
    let rows = fallback(Tab::Painpoints, &filters);
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r.subreddit == "r/wellness"));
  }

  #[test]
  fn test_full_intensity_threshold_matches_nothing() {
    let mut filters = FilterState::new();
    filters.set_intensity_pct(100).unwrap();
    assert!(fallback(Tab::Painpoints, &filters).is_empty());
  }

  #[test]
  fn test_response_shapes_parse() {
    let rows = serde_json::to_value(samples::rows(Tab::Questions)).unwrap();

    let wrapped: SearchResponse = serde_json::from_value(serde_json::json!({ "results": rows })).unwrap();
    assert!(matches!(wrapped, SearchResponse::Wrapped { .. }));

    let bare: SearchResponse = serde_json::from_value(rows).unwrap();
    assert!(matches!(bare, SearchResponse::Bare(ref r) if r.len() == samples::rows(Tab::Questions).len()));

    let files: SearchResponse = serde_json::from_str(r#"{"urls": ["https://x/a.csv"]}"#).unwrap();
    assert_eq!(files, SearchResponse::Files { urls: vec!["https://x/a.csv".into()] });

    assert!(serde_json::from_str::<SearchResponse>(r#"{"rows": []}"#).is_err());
  }

  #[test]
  fn test_rows_from_another_tab_fail_validation() {
    assert!(validate(Tab::Questions, samples::rows(Tab::Questions)).is_ok());
    assert!(validate(Tab::Triggers, samples::rows(Tab::Questions)).is_err());
  }
}
