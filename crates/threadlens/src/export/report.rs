//! Plain-text "Top Insights" report used when the backend can't produce one

use crate::model::Row;

/// Count occurrences, keeping first-seen order so equal counts stay stable
fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
  let mut counts: Vec<(&str, usize)> = Vec::new();
  for value in values {
    match counts.iter_mut().find(|(name, _)| *name == value) {
      Some((_, n)) => *n += 1,
      None => counts.push((value, 1)),
    }
  }
  counts.sort_by(|a, b| b.1.cmp(&a.1));
  counts
}

fn lines(counts: &[(&str, usize)], total: usize) -> String {
  counts
    .iter()
    .map(|(name, n)| format!("{}: {:.1}% ({})", name, *n as f64 / total as f64 * 100.0, n))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Topic and emotion distributions of `rows`, most frequent first
pub fn render(rows: &[Row]) -> String {
  let total = rows.len().max(1);
  let topics = tally(rows.iter().map(|r| r.topic.as_str()));
  let emotions = tally(rows.iter().map(|r| r.emotion.as_str()));

  format!(
    "Top Insights\n-------------\nCategories:\n{}\n\nEmotions:\n{}\n",
    lines(&topics, total),
    lines(&emotions, total)
  )
}
