use clap::ValueEnum;
use std::cmp::Ordering;
use std::fmt;

use crate::model::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
  Author,
  Timestamp,
  Subreddit,
  Upvotes,
  Intensity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

impl SortDirection {
  fn flipped(self) -> Self {
    match self {
      SortDirection::Asc => SortDirection::Desc,
      SortDirection::Desc => SortDirection::Asc,
    }
  }
}

/// Active sort column, `None` keeps insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
  pub column: Option<SortColumn>,
  pub direction: SortDirection,
}

impl SortState {
  pub fn by(column: SortColumn, direction: SortDirection) -> Self {
    Self { column: Some(column), direction }
  }

  /// Header click: a new column starts ascending, the active one flips
  pub fn click(&mut self, column: SortColumn) {
    if self.column == Some(column) {
      self.direction = self.direction.flipped();
    } else {
      self.column = Some(column);
      self.direction = SortDirection::Asc;
    }
  }
}

impl fmt::Display for SortState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.column {
      None => f.write_str("unsorted"),
      Some(column) => write!(f, "{:?} {:?}", column, self.direction),
    }
  }
}

fn compare(a: &Row, b: &Row, column: SortColumn) -> Ordering {
  match column {
    SortColumn::Author => a.author.to_lowercase().cmp(&b.author.to_lowercase()),
    SortColumn::Subreddit => a.subreddit.to_lowercase().cmp(&b.subreddit.to_lowercase()),
    SortColumn::Timestamp => a.timestamp_sort.cmp(&b.timestamp_sort),
    SortColumn::Upvotes => a.upvotes.cmp(&b.upvotes),
    SortColumn::Intensity => a.intensity.total_cmp(&b.intensity),
  }
}

/// Order `rows` by `state`. Stable in both directions: descending reverses
/// the comparator, not the output, so ties keep insertion order.
pub fn sort_rows<'a>(rows: &'a [Row], state: &SortState) -> Vec<&'a Row> {
  let mut sorted: Vec<&Row> = rows.iter().collect();
  if let Some(column) = state.column {
    sorted.sort_by(|a, b| {
      let ordering = compare(a, b, column);
      match state.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
      }
    });
  }
  sorted
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn row(id: &str, author: &str, upvotes: u64, hours: u64) -> Row {
    serde_json::from_value(json!({
      "id": id,
      "author": author,
      "subreddit": "r/health",
      "comment": "c",
      "upvotes": upvotes,
      "emotion": "joy",
      "intensity": 0.5,
      "topic": "t",
      "timestamp": "t",
      "timestampSort": hours,
      "question": "q"
    }))
    .unwrap()
  }

  fn ids(rows: &[&Row]) -> Vec<String> {
    rows.iter().map(|r| r.id.clone()).collect()
  }

  #[test]
  fn test_click_cycles_direction() {
    let mut state = SortState::default();
    state.click(SortColumn::Upvotes);
    assert_eq!(state, SortState::by(SortColumn::Upvotes, SortDirection::Asc));
    state.click(SortColumn::Upvotes);
    assert_eq!(state.direction, SortDirection::Desc);
    state.click(SortColumn::Author);
    assert_eq!(state, SortState::by(SortColumn::Author, SortDirection::Asc));
  }

  #[test]
  fn test_no_column_keeps_insertion_order() {
    let rows = vec![row("1", "b", 2, 1), row("2", "a", 1, 2)];
    assert_eq!(ids(&sort_rows(&rows, &SortState::default())), vec!["1", "2"]);
  }

  #[test]
  fn test_strings_compare_case_insensitively() {
    let rows = vec![row("1", "u/Zed", 0, 0), row("2", "u/alice", 0, 0), row("3", "u/Bob", 0, 0)];
    let sorted = sort_rows(&rows, &SortState::by(SortColumn::Author, SortDirection::Asc));
    assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
  }

  #[test]
  fn test_descending_is_stable_for_ties() {
    let rows = vec![row("1", "a", 5, 0), row("2", "b", 9, 0), row("3", "c", 5, 0)];
    let sorted = sort_rows(&rows, &SortState::by(SortColumn::Upvotes, SortDirection::Desc));
    assert_eq!(ids(&sorted), vec!["2", "1", "3"]);
  }

  #[test]
  fn test_descending_mirrors_ascending_on_samples() {
    let rows = crate::samples::rows(crate::model::Tab::Painpoints);
    for &column in SortColumn::value_variants() {
      let mut asc = sort_rows(rows, &SortState::by(column, SortDirection::Asc));
      asc.reverse();
      let desc = sort_rows(rows, &SortState::by(column, SortDirection::Desc));
      assert_eq!(asc.len(), desc.len());
      for (a, d) in asc.iter().zip(&desc) {
        assert_eq!(compare(a, d, column), Ordering::Equal, "{column:?}");
      }
    }
  }

  #[test]
  fn test_timestamp_sorts_by_hours() {
    let rows = vec![row("1", "a", 0, 48), row("2", "b", 0, 3), row("3", "c", 0, 24)];
    let sorted = sort_rows(&rows, &SortState::by(SortColumn::Timestamp, SortDirection::Asc));
    assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
  }
}
