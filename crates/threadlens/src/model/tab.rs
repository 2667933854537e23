use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::filter::FilterGroup;

/// One insight tab of the dashboard; each tab lists rows of a single kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
  Painpoints,
  FailedSolutions,
  DesiresWishes,
  Metaphors,
  Practitioners,
  Triggers,
  Questions,
}

const COMMON_GROUPS: &[FilterGroup] = &[FilterGroup::Subreddit, FilterGroup::Emotion, FilterGroup::Topic];

const PRACTITIONER_GROUPS: &[FilterGroup] =
  &[FilterGroup::Subreddit, FilterGroup::Emotion, FilterGroup::Topic, FilterGroup::Practitioner];

impl Tab {
  pub const ALL: [Tab; 7] = [
    Tab::Painpoints,
    Tab::FailedSolutions,
    Tab::DesiresWishes,
    Tab::Metaphors,
    Tab::Practitioners,
    Tab::Triggers,
    Tab::Questions,
  ];

  /// Value of the `data_type` field the backend expects for this tab
  pub fn data_type(&self) -> &'static str {
    match self {
      Tab::Painpoints => "painpoints",
      Tab::FailedSolutions => "failed_solutions",
      Tab::DesiresWishes => "desires_wishes",
      Tab::Metaphors => "metaphors",
      Tab::Practitioners => "practitioners",
      Tab::Triggers => "triggers",
      Tab::Questions => "questions",
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      Tab::Painpoints => "Painpoints and Frustrations",
      Tab::FailedSolutions => "Failed Solutions",
      Tab::DesiresWishes => "Desires and Wishes",
      Tab::Metaphors => "Metaphors",
      Tab::Practitioners => "Practitioner References",
      Tab::Triggers => "Trigger Phrases",
      Tab::Questions => "Questions",
    }
  }

  /// Column heading for the tab-specific field
  pub fn detail_label(&self) -> &'static str {
    match self {
      Tab::Painpoints => "Painpoint",
      Tab::FailedSolutions => "Failed Solution",
      Tab::DesiresWishes => "Desire/Wish",
      Tab::Metaphors => "Metaphor",
      Tab::Practitioners => "Practitioner",
      Tab::Triggers => "Trigger",
      Tab::Questions => "Question",
    }
  }

  pub fn export_filename(&self) -> &'static str {
    match self {
      Tab::Painpoints => "painpoints-data.csv",
      Tab::FailedSolutions => "failed-solutions.csv",
      Tab::DesiresWishes => "desires-wishes-data.csv",
      Tab::Metaphors => "metaphors-data.csv",
      Tab::Practitioners => "practitioner-data.csv",
      Tab::Triggers => "trigger-phrases-data.csv",
      Tab::Questions => "questions-data.csv",
    }
  }

  pub fn insights_filename(&self) -> &'static str {
    match self {
      Tab::Painpoints => "painpoints-insights.txt",
      Tab::FailedSolutions => "failed-solutions-insights.txt",
      Tab::DesiresWishes => "desires-wishes-insights.txt",
      Tab::Metaphors => "metaphors-insights.csv",
      Tab::Practitioners => "practitioner-insights.txt",
      Tab::Triggers => "trigger-phrases-insights.txt",
      Tab::Questions => "questions-insights.txt",
    }
  }

  /// Task sent with chat prompts when the user doesn't pick one
  pub fn default_chat_task(&self) -> &'static str {
    match self {
      Tab::Painpoints => "Generate a short summary about painpoints.",
      Tab::FailedSolutions | Tab::DesiresWishes => "Generate a short summary.",
      Tab::Metaphors => "Generate a short summary about metaphors.",
      Tab::Practitioners => "Generate a short summary about practitioner references.",
      Tab::Triggers => "Generate a short summary about triggers.",
      Tab::Questions => "Generate a short summary about questions.",
    }
  }

  /// Multi-select filter groups the tab exposes
  pub fn filter_groups(&self) -> &'static [FilterGroup] {
    match self {
      Tab::Practitioners => PRACTITIONER_GROUPS,
      _ => COMMON_GROUPS,
    }
  }

  pub fn has_group(&self, group: FilterGroup) -> bool {
    self.filter_groups().contains(&group)
  }
}

impl fmt::Display for Tab {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.data_type())
  }
}
