//! Scraper control panel: input validation, Lambda calls, and sample fallback

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{Backend, BackendClient};
use crate::error::{BackendError, ScraperError};
use crate::filter::Selection;
use crate::ingest;
use crate::samples;
use crate::search::Source;

pub const MAX_SUBREDDITS: usize = 3;
pub const MAX_POST_LIMIT: u32 = 1000;

/// Rough scrape cost per post and subreddit
const SECONDS_PER_POST: u64 = 10;

/// A raw scraped comment as listed by the scraper panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedComment {
  pub id: String,
  pub author: String,
  pub subreddit: String,
  pub comment: String,
  pub upvotes: u64,
  #[serde(default)]
  pub emotion: Option<String>,
  pub timestamp: String,
}

/// Links to CSV files returned by every scraper endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileList {
  #[serde(default)]
  pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeRequest {
  pub subreddits: Vec<String>,
  pub post_limit: u32,
}

/// Comma-separated subreddit names, trimmed, blanks dropped
pub fn split_subreddits(input: &str) -> Vec<String> {
  input.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

impl ScrapeRequest {
  /// Validate raw form input before anything is sent
  pub fn parse(subreddits: &str, posts: &str) -> Result<Self, ScraperError> {
    let names = split_subreddits(subreddits);
    if names.is_empty() || posts.trim().is_empty() {
      return Err(ScraperError::MissingInput);
    }
    if names.len() > MAX_SUBREDDITS {
      return Err(ScraperError::TooManySubreddits { count: names.len() });
    }

    let post_limit = posts
      .trim()
      .parse::<u32>()
      .ok()
      .filter(|n| (1..=MAX_POST_LIMIT).contains(n))
      .ok_or_else(|| ScraperError::PostLimitOutOfRange { value: posts.trim().to_string() })?;

    Ok(Self { subreddits: names, post_limit })
  }

  pub fn estimated_seconds(&self) -> u64 {
    self.subreddits.len() as u64 * u64::from(self.post_limit) * SECONDS_PER_POST
  }
}

/// Estimate for possibly incomplete form input; unparsable counts as zero
pub fn estimate_seconds(subreddits: &str, posts: &str) -> u64 {
  let posts: u64 = posts.trim().parse().unwrap_or(0);
  split_subreddits(subreddits).len() as u64 * posts * SECONDS_PER_POST
}

/// Render a duration as `45s`, `2min 5s`, `2min`, `1hr 3min` or `1hr`
pub fn format_duration(seconds: u64) -> String {
  if seconds < 60 {
    return format!("{seconds}s");
  }
  if seconds < 3600 {
    let (minutes, rest) = (seconds / 60, seconds % 60);
    return if rest > 0 { format!("{minutes}min {rest}s") } else { format!("{minutes}min") };
  }
  let (hours, minutes) = (seconds / 3600, (seconds % 3600) / 60);
  if minutes > 0 {
    format!("{hours}hr {minutes}min")
  } else {
    format!("{hours}hr")
  }
}

/// Body of the Lambda's `get_filtered_cmts`; the scraper view only filters
/// by subreddit and emotion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScraperFilterRequest {
  pub subreddits: Option<Vec<String>>,
  pub emotions: Option<Vec<String>>,
  pub keyword: Option<String>,
  pub min_intensity: Option<f64>,
  pub time: Option<String>,
}

impl ScraperFilterRequest {
  pub fn new(subreddits: &Selection, emotions: &Selection) -> Self {
    Self {
      subreddits: subreddits.to_request(),
      emotions: emotions.to_request(),
      keyword: None,
      min_intensity: None,
      time: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeOutcome {
  pub comments: Vec<ScrapedComment>,
  pub source: Source,
}

impl ScrapeOutcome {
  fn fallback(reason: impl Into<String>, comments: Vec<ScrapedComment>) -> Self {
    Self { comments, source: Source::Fallback { reason: reason.into() } }
  }
}

/// Sample comments narrowed by subreddit and emotion
pub fn filter_samples(subreddits: &Selection, emotions: &Selection) -> Vec<ScrapedComment> {
  samples::scraped_comments()
    .iter()
    .filter(|c| subreddits.contains(&c.subreddit))
    .filter(|c| emotions.contains(c.emotion.as_deref().unwrap_or_default()))
    .cloned()
    .collect()
}

/// Download every listed file concurrently; unreadable files are skipped
pub async fn load_files(backend: &dyn Backend, urls: &[String]) -> Vec<ScrapedComment> {
  let bodies = join_all(urls.iter().map(|url| backend.fetch_file(url))).await;

  let mut comments = Vec::new();
  for (url, body) in urls.iter().zip(bodies) {
    let text = match body {
      Ok(text) => text,
      Err(e) => {
        warn!("Skipping scraped file: {}", e);
        continue;
      }
    };
    match ingest::comments_from_csv(&text) {
      Ok(mut batch) => comments.append(&mut batch),
      Err(e) => warn!("Skipping unparsable scraped file {}: {}", url, e),
    }
  }
  comments
}

async fn resolve(
  client: &BackendClient,
  files: Result<FileList, BackendError>,
  fallback: impl FnOnce() -> Vec<ScrapedComment>,
) -> ScrapeOutcome {
  match files {
    Ok(files) if !files.urls.is_empty() => {
      debug!("Loading {} scraped files", files.urls.len());
      ScrapeOutcome { comments: load_files(client, &files.urls).await, source: Source::Backend }
    }
    Ok(_) => ScrapeOutcome::fallback("the scraper returned no files", fallback()),
    Err(e) => {
      warn!("Scraper request failed, using sample comments: {}", e);
      ScrapeOutcome::fallback(e.to_string(), fallback())
    }
  }
}

pub async fn scrape(client: &BackendClient, request: &ScrapeRequest) -> ScrapeOutcome {
  let files = client.scrape_comments(request).await;
  resolve(client, files, || samples::scraped_comments().to_vec()).await
}

/// Comments from the most recent scrape
pub async fn previous(client: &BackendClient) -> ScrapeOutcome {
  let files = client.previous_scrape().await;
  resolve(client, files, || samples::scraped_comments().to_vec()).await
}

pub async fn filter(client: &BackendClient, subreddits: &Selection, emotions: &Selection) -> ScrapeOutcome {
  let files = client.filter_scraped(&ScraperFilterRequest::new(subreddits, emotions)).await;
  resolve(client, files, || filter_samples(subreddits, emotions)).await
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_input_is_rejected() {
    assert_eq!(ScrapeRequest::parse("", "10"), Err(ScraperError::MissingInput));
    assert_eq!(ScrapeRequest::parse("health", "  "), Err(ScraperError::MissingInput));
    assert_eq!(ScrapeRequest::parse(" , ", "10"), Err(ScraperError::MissingInput));
  }

  #[test]
  fn test_more_than_three_subreddits_is_rejected() {
    assert_eq!(
      ScrapeRequest::parse("a, b, c, d", "10"),
      Err(ScraperError::TooManySubreddits { count: 4 })
    );
  }

  #[test]
  fn test_post_limit_bounds() {
    for bad in ["0", "1001", "-5", "ten"] {
      assert!(matches!(
        ScrapeRequest::parse("health", bad),
        Err(ScraperError::PostLimitOutOfRange { .. })
      ));
    }
    let request = ScrapeRequest::parse(" health ,fitness,", "1000").unwrap();
    assert_eq!(request.subreddits, vec!["health", "fitness"]);
    assert_eq!(request.post_limit, 1000);
  }

  #[test]
  fn test_estimate_and_format() {
    assert_eq!(estimate_seconds("a,b", "3"), 60);
    assert_eq!(estimate_seconds("a", ""), 0);
    assert_eq!(format_duration(0), "0s");
    assert_eq!(format_duration(45), "45s");
    assert_eq!(format_duration(60), "1min");
    assert_eq!(format_duration(125), "2min 5s");
    assert_eq!(format_duration(3600), "1hr");
    assert_eq!(format_duration(3 * 1000 * 10), "8hr 20min");
  }

  #[test]
  fn test_filter_request_sends_nulls() {
    let request = ScraperFilterRequest::new(&Selection::of(["health"]), &Selection::All);
    let value = serde_json::to_value(request).unwrap();
    assert_eq!(
      value,
      serde_json::json!({
        "subreddits": ["health"],
        "emotions": null,
        "keyword": null,
        "min_intensity": null,
        "time": null
      })
    );
  }

  #[test]
  fn test_sample_filter_by_subreddit_and_emotion() {
    let health = filter_samples(&Selection::of(["health"]), &Selection::All);
    assert!(!health.is_empty());
    assert!(health.iter().all(|c| c.subreddit == "health"));

    let none = filter_samples(&Selection::of(["health"]), &Selection::of(["grief"]));
    assert!(none.is_empty());
  }
}
