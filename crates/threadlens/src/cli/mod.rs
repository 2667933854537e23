pub mod commands;
pub mod display;

use clap::Args;

use crate::error::ViewError;
use crate::filter::{FilterGroup, TimeFilter, DEFAULT_INTENSITY_PCT};
use crate::model::Tab;
use crate::view::TabView;

/// Tab and filter selection shared by the data commands
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
  /// Insight tab to work on
  #[arg(value_enum)]
  pub tab: Tab,
  /// Case-insensitive keyword matched against every text column
  #[arg(short, long, default_value = "")]
  pub keyword: String,
  /// Only these subreddits (repeatable)
  #[arg(long = "subreddit")]
  pub subreddits: Vec<String>,
  /// Only these emotions (repeatable)
  #[arg(long = "emotion")]
  pub emotions: Vec<String>,
  /// Only these topics (repeatable)
  #[arg(long = "topic")]
  pub topics: Vec<String>,
  /// Only these practitioner types, practitioners tab only (repeatable)
  #[arg(long = "practitioner")]
  pub practitioners: Vec<String>,
  /// Minimum intensity in percent
  #[arg(short, long, default_value_t = DEFAULT_INTENSITY_PCT)]
  pub intensity: u32,
  #[arg(short, long, value_enum, default_value_t = TimeFilter::All)]
  pub time: TimeFilter,
}

impl FilterArgs {
  /// Build a view with these filters applied as if clicked in order
  pub fn to_view(&self) -> Result<TabView, ViewError> {
    let mut view = TabView::new(self.tab);
    view.set_keyword(self.keyword.clone());
    view.set_intensity_pct(self.intensity)?;
    view.set_time(self.time);

    let groups = [
      (FilterGroup::Subreddit, &self.subreddits),
      (FilterGroup::Emotion, &self.emotions),
      (FilterGroup::Topic, &self.topics),
      (FilterGroup::Practitioner, &self.practitioners),
    ];
    for (group, values) in groups {
      for value in values {
        view.toggle(group, value)?;
      }
    }
    Ok(view)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[derive(Parser)]
  struct Harness {
    #[command(flatten)]
    filters: FilterArgs,
  }

  #[test]
  fn test_flags_become_filter_state() {
    let args = Harness::parse_from([
      "t",
      "painpoints",
      "--keyword",
      "sleep",
      "--subreddit",
      "r/health",
      "--subreddit",
      "r/wellness",
      "--intensity",
      "70",
      "--time",
      "past_week",
    ]);
    let view = args.filters.to_view().unwrap();
    let filters = view.filters();
    assert_eq!(filters.keyword, "sleep");
    assert!(filters.subreddits.contains("r/wellness"));
    assert!(!filters.subreddits.contains("r/chronicpain"));
    assert!(filters.emotions.is_all());
    assert_eq!(filters.intensity_pct(), 70);
    assert_eq!(filters.time, TimeFilter::PastWeek);
  }

  #[test]
  fn test_invalid_flags_are_rejected() {
    let args = Harness::parse_from(["t", "questions", "--practitioner", "nurse"]);
    assert!(matches!(args.filters.to_view(), Err(ViewError::GroupUnavailable { .. })));

    let args = Harness::parse_from(["t", "questions", "--intensity", "120"]);
    assert_eq!(args.filters.to_view().unwrap_err(), ViewError::IntensityOutOfRange(120));
  }
}
