//! Filter state for one tab and the predicate it describes
//!
//! The same [`FilterState`] drives both the backend request
//! ([`FilterState::to_request`]) and the local fallback
//! ([`FilterState::matches`]).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ViewError;
use crate::model::{Detail, Emotion, PractitionerType, Row, Tab};

/// Value that selects every option of a multi-select group
pub const ALL: &str = "all";

pub const DEFAULT_INTENSITY_PCT: u32 = 50;

/// A multi-select group: either the `all` sentinel or a non-empty set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
  #[default]
  All,
  Only(BTreeSet<String>),
}

impl Selection {
  /// Build a selection from explicit values; no values means `all`
  pub fn of<I, S>(values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
    if set.is_empty() || set.contains(ALL) {
      Selection::All
    } else {
      Selection::Only(set)
    }
  }

  /// Apply one click on `value`. Choosing `all` resets the group, any other
  /// value is flipped and an emptied group falls back to `all`.
  pub fn toggle(&self, value: &str) -> Selection {
    if value == ALL {
      return Selection::All;
    }

    let mut set = match self {
      Selection::All => BTreeSet::new(),
      Selection::Only(set) => set.clone(),
    };
    if !set.remove(value) {
      set.insert(value.to_string());
    }

    if set.is_empty() {
      Selection::All
    } else {
      Selection::Only(set)
    }
  }

  pub fn is_all(&self) -> bool {
    matches!(self, Selection::All)
  }

  pub fn contains(&self, value: &str) -> bool {
    match self {
      Selection::All => true,
      Selection::Only(set) => set.contains(value),
    }
  }

  /// Wire form: `null` for `all`, otherwise the selected values
  pub fn to_request(&self) -> Option<Vec<String>> {
    match self {
      Selection::All => None,
      Selection::Only(set) => Some(set.iter().cloned().collect()),
    }
  }
}

impl fmt::Display for Selection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Selection::All => f.write_str(ALL),
      Selection::Only(set) => {
        let values: Vec<&str> = set.iter().map(String::as_str).collect();
        f.write_str(&values.join(", "))
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum FilterGroup {
  Subreddit,
  Emotion,
  Topic,
  Practitioner,
}

impl FilterGroup {
  pub fn as_str(&self) -> &'static str {
    match self {
      FilterGroup::Subreddit => "subreddit",
      FilterGroup::Emotion => "emotion",
      FilterGroup::Topic => "topic",
      FilterGroup::Practitioner => "practitioner",
    }
  }

  /// Options offered for this group given the rows a tab ships with
  pub fn options(&self, rows: &[Row]) -> Vec<String> {
    match self {
      FilterGroup::Subreddit => distinct(rows.iter().map(|r| r.subreddit.as_str())),
      FilterGroup::Topic => distinct(rows.iter().map(|r| r.topic.as_str())),
      FilterGroup::Emotion => Emotion::ALL.iter().map(|e| e.as_str().to_string()).collect(),
      FilterGroup::Practitioner => PractitionerType::options().map(String::from).collect(),
    }
  }
}

impl fmt::Display for FilterGroup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
  values.map(str::to_string).collect::<BTreeSet<_>>().into_iter().collect()
}

/// Time window measured against `timestampSort`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum TimeFilter {
  #[default]
  All,
  PastDay,
  PastWeek,
  PastMonth,
  PastYear,
}

impl TimeFilter {
  /// Maximum age in hours, `None` when unrestricted
  pub fn cutoff_hours(&self) -> Option<u64> {
    match self {
      TimeFilter::All => None,
      TimeFilter::PastDay => Some(24),
      TimeFilter::PastWeek => Some(168),
      TimeFilter::PastMonth => Some(720),
      TimeFilter::PastYear => Some(8760),
    }
  }

  pub fn admits(&self, hours_ago: u64) -> bool {
    self.cutoff_hours().map_or(true, |cutoff| hours_ago <= cutoff)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      TimeFilter::All => "all",
      TimeFilter::PastDay => "past_day",
      TimeFilter::PastWeek => "past_week",
      TimeFilter::PastMonth => "past_month",
      TimeFilter::PastYear => "past_year",
    }
  }
}

/// Body sent to the filter and export endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterRequest {
  pub keyword: String,
  pub subreddits: Option<Vec<String>>,
  pub emotions: Option<Vec<String>>,
  pub topics: Option<Vec<String>>,
  /// Only present on the Practitioners tab; inner `None` serialises as `null`
  #[serde(skip_serializing_if = "Option::is_none")]
  pub practitioners: Option<Option<Vec<String>>>,
  pub min_intensity: f64,
  pub time: Option<TimeFilter>,
  pub data_type: String,
}

/// Combined predicates of one tab
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
  pub keyword: String,
  pub subreddits: Selection,
  pub emotions: Selection,
  pub topics: Selection,
  pub practitioners: Selection,
  pub time: TimeFilter,
  intensity_pct: u32,
}

impl Default for FilterState {
  fn default() -> Self {
    Self {
      keyword: String::new(),
      subreddits: Selection::All,
      emotions: Selection::All,
      topics: Selection::All,
      practitioners: Selection::All,
      time: TimeFilter::All,
      intensity_pct: DEFAULT_INTENSITY_PCT,
    }
  }
}

impl FilterState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn intensity_pct(&self) -> u32 {
    self.intensity_pct
  }

  pub fn set_intensity_pct(&mut self, pct: u32) -> Result<(), ViewError> {
    if pct > 100 {
      return Err(ViewError::IntensityOutOfRange(pct));
    }
    self.intensity_pct = pct;
    Ok(())
  }

  pub fn min_intensity(&self) -> f64 {
    f64::from(self.intensity_pct) / 100.0
  }

  pub fn selection(&self, group: FilterGroup) -> &Selection {
    match group {
      FilterGroup::Subreddit => &self.subreddits,
      FilterGroup::Emotion => &self.emotions,
      FilterGroup::Topic => &self.topics,
      FilterGroup::Practitioner => &self.practitioners,
    }
  }

  fn selection_mut(&mut self, group: FilterGroup) -> &mut Selection {
    match group {
      FilterGroup::Subreddit => &mut self.subreddits,
      FilterGroup::Emotion => &mut self.emotions,
      FilterGroup::Topic => &mut self.topics,
      FilterGroup::Practitioner => &mut self.practitioners,
    }
  }

  pub fn toggle(&mut self, group: FilterGroup, value: &str) {
    let next = self.selection(group).toggle(value);
    *self.selection_mut(group) = next;
  }

  /// Reset every predicate to its default
  pub fn clear(&mut self) {
    *self = Self::default();
  }

  pub fn matches(&self, row: &Row) -> bool {
    self.matches_keyword(row)
      && self.subreddits.contains(&row.subreddit)
      && self.emotions.contains(row.emotion.as_str())
      && self.topics.contains(&row.topic)
      && self.matches_practitioner(row)
      && row.intensity >= self.min_intensity()
      && self.time.admits(row.timestamp_sort)
  }

  fn matches_keyword(&self, row: &Row) -> bool {
    let needle = self.keyword.trim().to_lowercase();
    if needle.is_empty() {
      return true;
    }
    row.keyword_fields().iter().any(|field| field.to_lowercase().contains(&needle))
  }

  fn matches_practitioner(&self, row: &Row) -> bool {
    match &row.detail {
      Detail::Practitioner { practitioner_type } => {
        self.practitioners.contains(practitioner_type.as_str())
      }
      _ => true,
    }
  }

  /// Rows that pass every predicate, in their original order
  pub fn apply(&self, rows: &[Row]) -> Vec<Row> {
    rows.iter().filter(|row| self.matches(row)).cloned().collect()
  }

  pub fn to_request(&self, tab: Tab) -> FilterRequest {
    FilterRequest {
      keyword: self.keyword.trim().to_string(),
      subreddits: self.subreddits.to_request(),
      emotions: self.emotions.to_request(),
      topics: self.topics.to_request(),
      practitioners: tab
        .has_group(FilterGroup::Practitioner)
        .then(|| self.practitioners.to_request()),
      min_intensity: self.min_intensity(),
      time: (self.time != TimeFilter::All).then_some(self.time),
      data_type: tab.data_type().to_string(),
    }
  }
}
