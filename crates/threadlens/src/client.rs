//! HTTP client for the insights backend and the scraper Lambda
//!
//! [`Backend`] is the seam the rest of the crate talks to; [`BackendClient`]
//! is the reqwest implementation. Every request is bounded by the configured
//! timeout and every failure comes back as a [`BackendError`] so callers can
//! fall back to local data.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::chat::{ChatMessage, ChatReply, ChatRequest, ChatSession};
use crate::config::Config;
use crate::error::BackendError;
use crate::filter::FilterRequest;
use crate::scraper::{FileList, ScrapeRequest, ScraperFilterRequest};
use crate::search::SearchResponse;

/// Operations the dashboard needs from the insights backend
#[async_trait]
pub trait Backend: Send + Sync {
  /// POST `/get_filtered_cmts`
  async fn filtered_comments(&self, request: &FilterRequest) -> Result<SearchResponse, BackendError>;

  /// GET an absolute file URL handed out by the backend
  async fn fetch_file(&self, url: &str) -> Result<String, BackendError>;

  /// POST `/export_data`, returning the CSV body
  async fn export_data(&self, request: &FilterRequest) -> Result<Vec<u8>, BackendError>;

  /// POST `/export_insights`, returning the report body
  async fn export_insights(&self, request: &FilterRequest) -> Result<Vec<u8>, BackendError>;

  async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError>;

  async fn list_sessions(&self) -> Result<Vec<ChatSession>, BackendError>;

  async fn save_session(&self, session: &ChatSession) -> Result<(), BackendError>;

  async fn delete_session(&self, id: i64) -> Result<(), BackendError>;
}

/// Configuration for the backend HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the insights backend (e.g., "http://localhost:3001")
  pub base_url: String,
  /// Base URL of the scraper Lambda function
  pub scraper_url: String,
  /// Chat endpoint path relative to `base_url`
  pub chat_path: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self::from(&Config::default())
  }
}

impl From<&Config> for ClientConfig {
  fn from(config: &Config) -> Self {
    Self {
      base_url: config.backend_url.clone(),
      scraper_url: config.scraper_url.clone(),
      chat_path: config.chat_path.clone(),
      timeout_secs: config.timeout_secs,
    }
  }
}

#[derive(Serialize)]
struct SaveSessionRequest<'a> {
  #[serde(rename = "chatId")]
  chat_id: i64,
  title: &'a str,
  messages: &'a [ChatMessage],
}

pub struct BackendClient {
  client: Client,
  config: ClientConfig,
}

fn join(base: &str, path: &str) -> String {
  format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

impl BackendClient {
  pub fn with_config(config: ClientConfig) -> Result<Self, BackendError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| BackendError::transport(&config.base_url, e))?;

    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  fn url(&self, path: &str) -> String {
    join(&self.config.base_url, path)
  }

  fn scraper_endpoint(&self, path: &str) -> String {
    join(&self.config.scraper_url, path)
  }

  /// Send with the configured timeout and reject non-2xx statuses
  async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, BackendError> {
    let secs = self.config.timeout_secs;
    debug!("Requesting {}", endpoint);

    let response = timeout(Duration::from_secs(secs), request.send())
      .await
      .map_err(|_| BackendError::timeout(endpoint, secs))?
      .map_err(|e| {
        if e.is_timeout() {
          BackendError::timeout(endpoint, secs)
        } else {
          BackendError::transport(endpoint, e)
        }
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(BackendError::status(endpoint, status.as_u16()));
    }
    Ok(response)
  }

  async fn bytes(&self, endpoint: &str, request: RequestBuilder) -> Result<Vec<u8>, BackendError> {
    let response = self.send(endpoint, request).await?;
    let body = response.bytes().await.map_err(|e| BackendError::transport(endpoint, e))?;
    Ok(body.to_vec())
  }

  async fn json<T: serde::de::DeserializeOwned>(
    &self,
    endpoint: &str,
    request: RequestBuilder,
  ) -> Result<T, BackendError> {
    let body = self.bytes(endpoint, request).await?;
    serde_json::from_slice(&body).map_err(|e| BackendError::schema(endpoint, e.to_string()))
  }

  /// GET `/health`
  pub async fn health_check(&self) -> Result<(), BackendError> {
    let url = self.url("/health");
    self.send(&url, self.client.get(&url)).await.map(|_| ())
  }

  /// Start a scrape of the given subreddits
  pub async fn scrape_comments(&self, request: &ScrapeRequest) -> Result<FileList, BackendError> {
    let url = self.scraper_endpoint("scrape_comments");
    self.json(&url, self.client.post(&url).json(request)).await
  }

  /// Files produced by the most recent scrape
  pub async fn previous_scrape(&self) -> Result<FileList, BackendError> {
    let url = self.scraper_endpoint("use_prev_data");
    self.json(&url, self.client.get(&url)).await
  }

  pub async fn filter_scraped(&self, request: &ScraperFilterRequest) -> Result<FileList, BackendError> {
    let url = self.scraper_endpoint("get_filtered_cmts");
    self.json(&url, self.client.post(&url).json(request)).await
  }
}

#[async_trait]
impl Backend for BackendClient {
  async fn filtered_comments(&self, request: &FilterRequest) -> Result<SearchResponse, BackendError> {
    let url = self.url("/get_filtered_cmts");
    self.json(&url, self.client.post(&url).json(request)).await
  }

  async fn fetch_file(&self, url: &str) -> Result<String, BackendError> {
    let body = self.bytes(url, self.client.get(url)).await?;
    String::from_utf8(body).map_err(|e| BackendError::schema(url, e.to_string()))
  }

  async fn export_data(&self, request: &FilterRequest) -> Result<Vec<u8>, BackendError> {
    let url = self.url("/export_data");
    self.bytes(&url, self.client.post(&url).json(request)).await
  }

  async fn export_insights(&self, request: &FilterRequest) -> Result<Vec<u8>, BackendError> {
    let url = self.url("/export_insights");
    self.bytes(&url, self.client.post(&url).json(request)).await
  }

  async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
    let url = self.url(&self.config.chat_path);
    let value: Value = self.json(&url, self.client.post(&url).json(request)).await?;
    ChatReply::from_value(&value)
      .ok_or_else(|| BackendError::schema(&url, "no response, summary, message or content text"))
  }

  async fn list_sessions(&self) -> Result<Vec<ChatSession>, BackendError> {
    let url = self.url("/chat-history");
    self.json(&url, self.client.get(&url)).await
  }

  async fn save_session(&self, session: &ChatSession) -> Result<(), BackendError> {
    let url = self.url("/ai/chats");
    let body = SaveSessionRequest { chat_id: session.id, title: &session.title, messages: &session.messages };
    self.send(&url, self.client.post(&url).json(&body)).await.map(|_| ())
  }

  async fn delete_session(&self, id: i64) -> Result<(), BackendError> {
    let url = self.url(&format!("/ai/chats/{id}"));
    self.send(&url, self.client.delete(&url)).await.map(|_| ())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_join_normalises_slashes() {
    assert_eq!(join("http://localhost:3001/", "/export_data"), "http://localhost:3001/export_data");
    assert_eq!(join("https://lambda.example/", "use_prev_data"), "https://lambda.example/use_prev_data");
    assert_eq!(join("http://h", "ai/chat"), "http://h/ai/chat");
  }

  #[test]
  fn test_client_config_follows_app_config() {
    let config = Config { timeout_secs: 7, ..Config::default() };
    let client_config = ClientConfig::from(&config);
    assert_eq!(client_config.timeout_secs, 7);
    assert_eq!(client_config.base_url, "http://localhost:3001");
    assert_eq!(client_config.chat_path, "/ai/chat");
  }
}
