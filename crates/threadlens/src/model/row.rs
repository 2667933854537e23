use serde::{Deserialize, Serialize};

use super::{Emotion, PractitionerType, Tab};

/// One analysed comment as rendered in a tab's table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
  pub id: String,
  pub author: String,
  pub subreddit: String,
  pub comment: String,
  pub upvotes: u64,
  pub emotion: Emotion,
  /// Classifier confidence in `[0, 1]`
  pub intensity: f64,
  pub topic: String,
  /// Human readable age, e.g. "3 hours ago"
  pub timestamp: String,
  /// Age in whole hours; lower is more recent
  #[serde(rename = "timestampSort")]
  pub timestamp_sort: u64,
  #[serde(flatten)]
  pub detail: Detail,
}

/// The tab-specific field of a row; its shape identifies the tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detail {
  Painpoint {
    painpoint: String,
  },
  FailedSolution {
    #[serde(rename = "failedSolution")]
    failed_solution: String,
  },
  DesireWish {
    desire_wish: String,
  },
  Metaphor {
    #[serde(rename = "metaphorPhrase")]
    metaphor_phrase: String,
  },
  Practitioner {
    practitioner_type: PractitionerType,
  },
  Trigger {
    #[serde(rename = "triggerPhrase")]
    trigger_phrase: String,
  },
  Question {
    question: String,
  },
}

impl Detail {
  pub fn tab(&self) -> Tab {
    match self {
      Detail::Painpoint { .. } => Tab::Painpoints,
      Detail::FailedSolution { .. } => Tab::FailedSolutions,
      Detail::DesireWish { .. } => Tab::DesiresWishes,
      Detail::Metaphor { .. } => Tab::Metaphors,
      Detail::Practitioner { .. } => Tab::Practitioners,
      Detail::Trigger { .. } => Tab::Triggers,
      Detail::Question { .. } => Tab::Questions,
    }
  }

  pub fn text(&self) -> &str {
    match self {
      Detail::Painpoint { painpoint } => painpoint,
      Detail::FailedSolution { failed_solution } => failed_solution,
      Detail::DesireWish { desire_wish } => desire_wish,
      Detail::Metaphor { metaphor_phrase } => metaphor_phrase,
      Detail::Practitioner { practitioner_type } => practitioner_type.as_str(),
      Detail::Trigger { trigger_phrase } => trigger_phrase,
      Detail::Question { question } => question,
    }
  }

  /// Build the detail variant for `tab` from a raw string value
  pub fn for_tab(tab: Tab, value: String) -> Detail {
    match tab {
      Tab::Painpoints => Detail::Painpoint { painpoint: value },
      Tab::FailedSolutions => Detail::FailedSolution { failed_solution: value },
      Tab::DesiresWishes => Detail::DesireWish { desire_wish: value },
      Tab::Metaphors => Detail::Metaphor { metaphor_phrase: value },
      Tab::Practitioners => Detail::Practitioner {
        practitioner_type: value.parse().unwrap_or(PractitionerType::Unknown),
      },
      Tab::Triggers => Detail::Trigger { trigger_phrase: value },
      Tab::Questions => Detail::Question { question: value },
    }
  }
}

impl Row {
  pub fn tab(&self) -> Tab {
    self.detail.tab()
  }

  /// Fields searched by the keyword filter
  pub fn keyword_fields(&self) -> [&str; 6] {
    [
      &self.comment,
      &self.author,
      &self.subreddit,
      self.emotion.as_str(),
      &self.topic,
      self.detail.text(),
    ]
  }

  /// Check invariants that serde alone can't express
  pub fn validate(&self) -> Result<(), String> {
    if !self.intensity.is_finite() || !(0.0..=1.0).contains(&self.intensity) {
      return Err(format!("row {} has intensity {} outside [0, 1]", self.id, self.intensity));
    }
    Ok(())
  }
}
