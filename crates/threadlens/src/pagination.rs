use std::fmt;

pub const PAGE_SIZE: usize = 7;

/// Pages at or below this count are listed without ellipses
const COMPACT_LIMIT: usize = 6;

/// One rendered page of a result set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub rows: Vec<T>,
  /// 1-indexed, inclusive; 0 when there are no rows
  pub range_start: usize,
  pub range_end: usize,
  pub total: usize,
  pub current_page: usize,
  pub last_page: usize,
}

pub fn last_page(total: usize) -> usize {
  total.div_ceil(PAGE_SIZE).max(1)
}

/// Slice `items` to `page`, clamping the page into `1..=last_page`
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
  let total = items.len();
  let last = last_page(total);
  let current = page.clamp(1, last);

  let start = (current - 1) * PAGE_SIZE;
  let end = (start + PAGE_SIZE).min(total);
  let rows = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

  let (range_start, range_end) = if rows.is_empty() { (0, 0) } else { (start + 1, end) };

  Page { rows, range_start, range_end, total, current_page: current, last_page: last }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
  Page(usize),
  Ellipsis,
}

impl fmt::Display for PageToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PageToken::Page(n) => write!(f, "{n}"),
      PageToken::Ellipsis => f.write_str("…"),
    }
  }
}

/// Compressed page list around `current`
pub fn page_window(current: usize, last: usize) -> Vec<PageToken> {
  let last = last.max(1);
  if last <= COMPACT_LIMIT {
    return (1..=last).map(PageToken::Page).collect();
  }

  let current = current.clamp(1, last);
  let mut pages = vec![1, 2, last - 1, last, current.saturating_sub(1), current, current + 1];
  pages.retain(|p| (1..=last).contains(p));
  pages.sort_unstable();
  pages.dedup();

  let mut tokens = Vec::with_capacity(pages.len() + 2);
  let mut previous: Option<usize> = None;
  for page in pages {
    if previous.is_some_and(|p| page - p > 1) {
      tokens.push(PageToken::Ellipsis);
    }
    tokens.push(PageToken::Page(page));
    previous = Some(page);
  }
  tokens
}
