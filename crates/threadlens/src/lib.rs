//! Threadlens - Reddit Comment Insights Explorer
//!
//! Client-side core for browsing analysed Reddit comments: per-tab filter
//! state, backend search with local fallback, sorting, pagination, CSV
//! export, and the chat panel that asks the insights backend about the
//! current slice of data.

pub mod chat;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod pagination;
pub mod samples;
pub mod scraper;
pub mod search;
pub mod sort;
pub mod view;

pub use error::{BackendError, ConfigError, ScraperError, StoreError, ViewError};
pub use filter::{FilterGroup, FilterState, Selection, TimeFilter};
pub use model::{Detail, Emotion, PractitionerType, Row, Tab};
pub use view::TabView;
