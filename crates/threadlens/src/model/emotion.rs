use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The 28 emotion labels produced by the backend classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
  Admiration,
  Amusement,
  Anger,
  Annoyance,
  Approval,
  Caring,
  Confusion,
  Curiosity,
  Desire,
  Disappointment,
  Disapproval,
  Disgust,
  Embarrassment,
  Excitement,
  Fear,
  Gratitude,
  Grief,
  Joy,
  Love,
  Nervousness,
  Optimism,
  Pride,
  Realization,
  Relief,
  Remorse,
  Sadness,
  Surprise,
  Neutral,
}

impl Emotion {
  pub const ALL: [Emotion; 28] = [
    Emotion::Admiration,
    Emotion::Amusement,
    Emotion::Anger,
    Emotion::Annoyance,
    Emotion::Approval,
    Emotion::Caring,
    Emotion::Confusion,
    Emotion::Curiosity,
    Emotion::Desire,
    Emotion::Disappointment,
    Emotion::Disapproval,
    Emotion::Disgust,
    Emotion::Embarrassment,
    Emotion::Excitement,
    Emotion::Fear,
    Emotion::Gratitude,
    Emotion::Grief,
    Emotion::Joy,
    Emotion::Love,
    Emotion::Nervousness,
    Emotion::Optimism,
    Emotion::Pride,
    Emotion::Realization,
    Emotion::Relief,
    Emotion::Remorse,
    Emotion::Sadness,
    Emotion::Surprise,
    Emotion::Neutral,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Emotion::Admiration => "admiration",
      Emotion::Amusement => "amusement",
      Emotion::Anger => "anger",
      Emotion::Annoyance => "annoyance",
      Emotion::Approval => "approval",
      Emotion::Caring => "caring",
      Emotion::Confusion => "confusion",
      Emotion::Curiosity => "curiosity",
      Emotion::Desire => "desire",
      Emotion::Disappointment => "disappointment",
      Emotion::Disapproval => "disapproval",
      Emotion::Disgust => "disgust",
      Emotion::Embarrassment => "embarrassment",
      Emotion::Excitement => "excitement",
      Emotion::Fear => "fear",
      Emotion::Gratitude => "gratitude",
      Emotion::Grief => "grief",
      Emotion::Joy => "joy",
      Emotion::Love => "love",
      Emotion::Nervousness => "nervousness",
      Emotion::Optimism => "optimism",
      Emotion::Pride => "pride",
      Emotion::Realization => "realization",
      Emotion::Relief => "relief",
      Emotion::Remorse => "remorse",
      Emotion::Sadness => "sadness",
      Emotion::Surprise => "surprise",
      Emotion::Neutral => "neutral",
    }
  }

  pub fn emoji(&self) -> &'static str {
    match self {
      Emotion::Admiration => "😍",
      Emotion::Amusement => "😆",
      Emotion::Approval => "👍",
      Emotion::Caring => "🤗",
      Emotion::Curiosity => "🤔",
      Emotion::Desire => "💖",
      Emotion::Excitement => "🤩",
      Emotion::Gratitude => "🙏",
      Emotion::Joy => "😄",
      Emotion::Love => "❤️",
      Emotion::Optimism => "🌈",
      Emotion::Pride => "😎",
      Emotion::Anger => "😡",
      Emotion::Annoyance => "😠",
      Emotion::Disappointment => "😞",
      Emotion::Disapproval => "👎",
      Emotion::Disgust => "🤢",
      Emotion::Embarrassment => "😳",
      Emotion::Fear => "😨",
      Emotion::Grief => "😭",
      Emotion::Nervousness => "😬",
      Emotion::Remorse => "😔",
      Emotion::Sadness => "😢",
      Emotion::Confusion => "😕",
      Emotion::Realization => "💡",
      Emotion::Relief => "😌",
      Emotion::Surprise => "😲",
      Emotion::Neutral => "😐",
    }
  }
}

impl fmt::Display for Emotion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Emotion {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let needle = s.trim().to_lowercase();
    Emotion::ALL
      .iter()
      .copied()
      .find(|e| e.as_str() == needle)
      .ok_or_else(|| format!("unknown emotion '{s}'"))
  }
}
