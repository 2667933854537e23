//! Bundled sample datasets used when the backend is unavailable
//!
//! Each tab ships a small JSON fixture compiled into the binary. The fixtures
//! are parsed once on first use and never mutated afterwards.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::error;

use crate::model::{Row, Tab};
use crate::scraper::ScrapedComment;

fn fixture(tab: Tab) -> &'static str {
  match tab {
    Tab::Painpoints => include_str!("../data/samples/painpoints.json"),
    Tab::FailedSolutions => include_str!("../data/samples/failed_solutions.json"),
    Tab::DesiresWishes => include_str!("../data/samples/desires_wishes.json"),
    Tab::Metaphors => include_str!("../data/samples/metaphors.json"),
    Tab::Practitioners => include_str!("../data/samples/practitioners.json"),
    Tab::Triggers => include_str!("../data/samples/triggers.json"),
    Tab::Questions => include_str!("../data/samples/questions.json"),
  }
}

const SCRAPER_FIXTURE: &str = include_str!("../data/samples/scraper.json");

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> Vec<T> {
  match serde_json::from_str(raw) {
    Ok(items) => items,
    Err(e) => {
      error!("Bundled sample dataset '{}' is invalid: {}", name, e);
      Vec::new()
    }
  }
}

static ROWS: Lazy<HashMap<Tab, Vec<Row>>> =
  Lazy::new(|| Tab::ALL.iter().map(|&tab| (tab, parse(tab.data_type(), fixture(tab)))).collect());

static SCRAPED: Lazy<Vec<ScrapedComment>> = Lazy::new(|| parse("scraper", SCRAPER_FIXTURE));

/// Sample rows for `tab`, in fixture order
pub fn rows(tab: Tab) -> &'static [Row] {
  ROWS.get(&tab).map(Vec::as_slice).unwrap_or_default()
}

pub fn scraped_comments() -> &'static [ScrapedComment] {
  &SCRAPED
}
