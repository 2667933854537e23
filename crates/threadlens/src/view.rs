//! One filterable, sortable, paginated list of rows for a tab
//!
//! Searches are split into [`TabView::begin_search`] and
//! [`TabView::finish_search`] so several can be in flight. Each carries a
//! generation number and only the newest one may replace the rows.

use tracing::debug;

use crate::client::Backend;
use crate::error::ViewError;
use crate::filter::{FilterGroup, FilterState, TimeFilter};
use crate::model::{Row, Tab};
use crate::pagination::{self, Page, PageToken};
use crate::samples;
use crate::search::{self, SearchResult, Source};
use crate::sort::{self, SortColumn, SortState};

/// Issued when a search starts; hand it back with the result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
  generation: u64,
  filters: FilterState,
}

impl SearchTicket {
  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn filters(&self) -> &FilterState {
    &self.filters
  }
}

#[derive(Debug)]
pub struct TabView {
  tab: Tab,
  filters: FilterState,
  applied: Option<FilterState>,
  sort: SortState,
  page: usize,
  rows: Vec<Row>,
  source: Source,
  generation: u64,
  in_flight: Option<SearchTicket>,
}

impl TabView {
  /// A view showing the tab's sample rows until the first search lands
  pub fn new(tab: Tab) -> Self {
    Self {
      tab,
      filters: FilterState::new(),
      applied: None,
      sort: SortState::default(),
      page: 1,
      rows: samples::rows(tab).to_vec(),
      source: Source::Fallback { reason: "no search has run yet".to_string() },
      generation: 0,
      in_flight: None,
    }
  }

  pub fn tab(&self) -> Tab {
    self.tab
  }

  pub fn filters(&self) -> &FilterState {
    &self.filters
  }

  /// Filters that produced [`TabView::rows`]; the edited filters until a
  /// search has landed
  pub fn applied_filters(&self) -> &FilterState {
    self.applied.as_ref().unwrap_or(&self.filters)
  }

  pub fn rows(&self) -> &[Row] {
    &self.rows
  }

  pub fn source(&self) -> &Source {
    &self.source
  }

  pub fn sort_state(&self) -> SortState {
    self.sort
  }

  pub fn current_page(&self) -> usize {
    self.page
  }

  pub fn is_loading(&self) -> bool {
    self.in_flight.is_some()
  }

  pub fn set_keyword(&mut self, keyword: impl Into<String>) {
    self.filters.keyword = keyword.into();
  }

  pub fn set_intensity_pct(&mut self, pct: u32) -> Result<(), ViewError> {
    self.filters.set_intensity_pct(pct)
  }

  pub fn set_time(&mut self, time: TimeFilter) {
    self.filters.time = time;
  }

  /// Toggle one option of a group this tab exposes
  pub fn toggle(&mut self, group: FilterGroup, value: &str) -> Result<(), ViewError> {
    if !self.tab.has_group(group) {
      return Err(ViewError::GroupUnavailable { group: group.to_string(), tab: self.tab.to_string() });
    }
    self.filters.toggle(group, value);
    Ok(())
  }

  pub fn clear_filters(&mut self) {
    self.filters.clear();
  }

  /// Options for a group, derived from the tab's sample rows
  pub fn options(&self, group: FilterGroup) -> Vec<String> {
    group.options(samples::rows(self.tab))
  }

  pub fn click_column(&mut self, column: SortColumn) {
    self.sort.click(column);
  }

  pub fn set_sort(&mut self, sort: SortState) {
    self.sort = sort;
  }

  pub fn set_page(&mut self, page: usize) -> Result<(), ViewError> {
    if page == 0 {
      return Err(ViewError::InvalidPage);
    }
    self.page = page;
    Ok(())
  }

  /// Start a search with the current filters. Repeating the in-flight
  /// filters is rejected; different filters supersede it.
  pub fn begin_search(&mut self) -> Result<SearchTicket, ViewError> {
    if let Some(pending) = &self.in_flight {
      if pending.filters == self.filters {
        return Err(ViewError::Busy);
      }
      debug!("Search generation {} superseded", pending.generation);
    }

    self.generation += 1;
    let ticket = SearchTicket { generation: self.generation, filters: self.filters.clone() };
    self.in_flight = Some(ticket.clone());
    Ok(ticket)
  }

  /// Apply a finished search. Returns `false` when a newer search has
  /// started since, in which case the result is dropped.
  pub fn finish_search(&mut self, ticket: &SearchTicket, result: SearchResult) -> bool {
    if ticket.generation != self.generation {
      debug!("Dropping stale search generation {} (latest {})", ticket.generation, self.generation);
      return false;
    }

    self.rows = result.rows;
    self.source = result.source;
    self.applied = Some(ticket.filters.clone());
    self.page = 1;
    self.in_flight = None;
    true
  }

  pub async fn run_search(&mut self, backend: &dyn Backend) -> Result<&Source, ViewError> {
    let ticket = self.begin_search()?;
    let result = search::run_search(backend, self.tab, ticket.filters()).await;
    self.finish_search(&ticket, result);
    Ok(&self.source)
  }

  /// Current page of the sorted rows; the page is clamped when the set shrank
  pub fn visible(&self) -> Page<Row> {
    let sorted: Vec<Row> = sort::sort_rows(&self.rows, &self.sort).into_iter().cloned().collect();
    pagination::paginate(&sorted, self.page)
  }

  pub fn page_window(&self) -> Vec<PageToken> {
    let last = pagination::last_page(self.rows.len());
    pagination::page_window(self.page.clamp(1, last), last)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sort::SortDirection;

  fn result(rows: Vec<Row>) -> SearchResult {
    SearchResult { rows, source: Source::Backend }
  }

  #[test]
  fn test_starts_with_samples_on_page_one() {
    let view = TabView::new(Tab::Triggers);
    assert_eq!(view.rows().len(), samples::rows(Tab::Triggers).len());
    assert_eq!(view.current_page(), 1);
    assert!(!view.is_loading());
  }

  #[test]
  fn test_duplicate_search_is_busy() {
    let mut view = TabView::new(Tab::Painpoints);
    view.begin_search().unwrap();
    assert_eq!(view.begin_search(), Err(ViewError::Busy));
  }

  #[test]
  fn test_stale_result_is_dropped() {
    let mut view = TabView::new(Tab::Painpoints);
    let first = view.begin_search().unwrap();
    view.set_keyword("sleep");
    let second = view.begin_search().unwrap();
    assert!(second.generation() > first.generation());

    assert!(!view.finish_search(&first, result(Vec::new())));
    assert_eq!(view.rows().len(), samples::rows(Tab::Painpoints).len());
    assert!(view.is_loading());

    let one = samples::rows(Tab::Painpoints)[..1].to_vec();
    assert!(view.finish_search(&second, result(one)));
    assert_eq!(view.rows().len(), 1);
    assert!(!view.is_loading());
  }

  #[test]
  fn test_applied_filters_follow_the_landed_search() {
    let mut view = TabView::new(Tab::Painpoints);
    view.set_keyword("sleep");
    let ticket = view.begin_search().unwrap();
    view.finish_search(&ticket, result(Vec::new()));

    view.set_keyword("anxiety");
    assert_eq!(view.applied_filters().keyword, "sleep");
    assert_eq!(view.filters().keyword, "anxiety");

    let ticket = view.begin_search().unwrap();
    assert_eq!(view.applied_filters().keyword, "sleep");
    view.finish_search(&ticket, result(Vec::new()));
    assert_eq!(view.applied_filters().keyword, "anxiety");
  }

  #[test]
  fn test_new_results_reset_page() {
    let mut view = TabView::new(Tab::Painpoints);
    view.set_page(3).unwrap();
    let ticket = view.begin_search().unwrap();
    view.finish_search(&ticket, result(samples::rows(Tab::Painpoints).to_vec()));
    assert_eq!(view.current_page(), 1);
  }

  #[test]
  fn test_page_zero_is_rejected() {
    let mut view = TabView::new(Tab::Questions);
    assert_eq!(view.set_page(0), Err(ViewError::InvalidPage));
  }

  #[test]
  fn test_practitioner_group_only_on_practitioner_tab() {
    let mut view = TabView::new(Tab::Metaphors);
    assert!(matches!(
      view.toggle(FilterGroup::Practitioner, "nurse"),
      Err(ViewError::GroupUnavailable { .. })
    ));

    let mut view = TabView::new(Tab::Practitioners);
    view.toggle(FilterGroup::Practitioner, "nurse").unwrap();
    assert!(view.filters().practitioners.contains("nurse"));
    assert!(!view.filters().practitioners.contains("doctor"));
  }

  #[test]
  fn test_visible_rows_are_sorted_then_paged() {
    let mut view = TabView::new(Tab::Painpoints);
    view.set_sort(SortState::by(SortColumn::Upvotes, SortDirection::Desc));
    let page = view.visible();
    assert!(page.rows.len() <= pagination::PAGE_SIZE);
    assert!(page.rows.windows(2).all(|w| w[0].upvotes >= w[1].upvotes));

    view.set_page(99).unwrap();
    assert_eq!(view.visible().current_page, view.visible().last_page);
  }
}
