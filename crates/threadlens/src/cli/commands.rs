use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use std::time::Instant;

use crate::chat::panel::ChatPanel;
use crate::chat::sessions::SessionManager;
use crate::chat::transcript::TranscriptStore;
use crate::cli::display;
use crate::cli::FilterArgs;
use crate::client::{BackendClient, ClientConfig};
use crate::config::Config;
use crate::error::ViewError;
use crate::export;
use crate::filter::{FilterGroup, Selection};
use crate::model::Tab;
use crate::scraper::{self, ScrapeRequest};
use crate::search::Source;
use crate::sort::{SortColumn, SortDirection, SortState};
use crate::view::TabView;

fn connect() -> Result<(Config, BackendClient)> {
  let config = Config::load().context("Failed to load configuration")?;
  let client = BackendClient::with_config(ClientConfig::from(&config))?;
  Ok((config, client))
}

fn transcripts(config: &Config) -> Result<TranscriptStore> {
  Ok(TranscriptStore::new(config.data_dir()?.join("transcripts")))
}

/// Run a filtered search and print one page of it
pub async fn search(filters: &FilterArgs, sort: Option<SortColumn>, desc: bool, page: usize) -> Result<()> {
  let (_, client) = connect()?;
  let mut view = filters.to_view()?;

  let source = view.run_search(&client).await?.clone();
  display::print_source(&source);

  if let Some(column) = sort {
    let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
    view.set_sort(SortState::by(column, direction));
  }
  view.set_page(page)?;

  display::print_page(view.tab(), &view.visible(), &view.page_window());
  Ok(())
}

/// Download the data or insights file for the filtered slice
pub async fn export(filters: &FilterArgs, insights: bool, out: &Path) -> Result<()> {
  let (_, client) = connect()?;
  let mut view = filters.to_view()?;
  view.run_search(&client).await?;

  let outcome = if insights {
    export::export_insights(&client, &view, out).await?
  } else {
    export::export_data(&client, &view, out).await?
  };

  if let Source::Fallback { .. } = outcome.source {
    println!("{} Export generated locally from {} rows", "⚠".yellow(), view.rows().len());
  }
  println!("{} Saved {} ({} bytes)", "✓".green(), outcome.path.display().to_string().cyan(), outcome.bytes);
  Ok(())
}

/// Ask about the current slice; the tab's transcript is kept between runs
pub async fn chat(
  filters: &FilterArgs,
  prompt: &[String],
  task: Option<&str>,
  history: bool,
  clear: bool,
) -> Result<()> {
  let (config, client) = connect()?;
  let store = transcripts(&config)?;
  let key = TranscriptStore::key_for(filters.tab);

  if clear {
    store.clear(&key)?;
    println!("{} Cleared {} chat", "✓".green(), filters.tab.title());
    return Ok(());
  }

  let mut panel = ChatPanel::with_messages(filters.tab, store.load_or_default(&key));
  let text = prompt.join(" ");
  if history || text.trim().is_empty() {
    display::print_messages(panel.messages());
    return Ok(());
  }

  let view = filters.to_view()?;
  panel.toggle_bar(Instant::now());
  let reply = panel.send(&client, &text, task, view.filters().to_request(view.tab())).await?;
  store.save(&key, panel.messages())?;

  if let Some(reply) = reply {
    display::print_message(&reply);
  }
  Ok(())
}

pub async fn ask_list() -> Result<()> {
  let (_, client) = connect()?;
  let manager = SessionManager::load(&client).await;
  display::print_sessions(manager.sessions(), manager.active().map(|s| s.id));
  Ok(())
}

/// Send a prompt in an existing Ask-AI session, or a new one
pub async fn ask_send(session: Option<i64>, tags: &[String], text: &[String]) -> Result<()> {
  let (_, client) = connect()?;
  let mut manager = SessionManager::load(&client).await;

  let id = match session {
    Some(id) => {
      manager.select(id)?;
      id
    }
    None => manager.new_session(),
  };

  match manager.send(&client, id, &text.join(" "), tags).await? {
    Some(reply) => {
      println!("{} {}", "chat".dimmed(), id.to_string().dimmed());
      display::print_message(&reply);
    }
    None => println!("Nothing to send."),
  }
  Ok(())
}

pub async fn ask_delete(id: i64) -> Result<()> {
  let (_, client) = connect()?;
  let mut manager = SessionManager::load(&client).await;
  manager.delete(&client, id).await?;
  println!("{} Deleted chat {}", "✓".green(), id);
  Ok(())
}

pub async fn scrape_run(subreddits: &str, posts: &str) -> Result<()> {
  let request = ScrapeRequest::parse(subreddits, posts)?;
  let (_, client) = connect()?;

  println!(
    "Scraping {} for {} posts each, estimated {}",
    request.subreddits.join(", ").cyan(),
    request.post_limit,
    scraper::format_duration(request.estimated_seconds()).yellow()
  );
  let outcome = scraper::scrape(&client, &request).await;
  display::print_source(&outcome.source);
  display::print_comments(&outcome.comments);
  Ok(())
}

pub async fn scrape_previous() -> Result<()> {
  let (_, client) = connect()?;
  let outcome = scraper::previous(&client).await;
  display::print_source(&outcome.source);
  display::print_comments(&outcome.comments);
  Ok(())
}

pub async fn scrape_filter(subreddits: &[String], emotions: &[String]) -> Result<()> {
  let (_, client) = connect()?;
  let outcome =
    scraper::filter(&client, &Selection::of(subreddits.iter().cloned()), &Selection::of(emotions.iter().cloned()))
      .await;
  display::print_source(&outcome.source);
  display::print_comments(&outcome.comments);
  Ok(())
}

/// List the filter options a tab offers
pub fn options(tab: Tab, group: Option<FilterGroup>) -> Result<()> {
  let view = TabView::new(tab);
  let groups: Vec<FilterGroup> = match group {
    Some(group) if !tab.has_group(group) => {
      return Err(ViewError::GroupUnavailable { group: group.to_string(), tab: tab.to_string() }.into());
    }
    Some(group) => vec![group],
    None => tab.filter_groups().to_vec(),
  };

  for group in groups {
    println!("{}", group.as_str().blue().bold());
    for option in view.options(group) {
      println!("  {option}");
    }
  }
  Ok(())
}

/// Show the effective configuration and whether the backend answers
pub async fn status() -> Result<()> {
  let (config, client) = connect()?;

  println!("{} {}", "backend:".dimmed(), config.backend_url);
  println!("{} {}", "scraper:".dimmed(), config.scraper_url);
  println!("{} {}", "chat:".dimmed(), client.config().chat_path);
  println!("{} {}s", "timeout:".dimmed(), config.timeout_secs);
  match config.data_dir() {
    Ok(dir) => println!("{} {}", "data:".dimmed(), dir.display()),
    Err(e) => println!("{} {}", "data:".dimmed(), e.to_string().red()),
  }

  match client.health_check().await {
    Ok(()) => println!("{} Backend reachable", "✓".green()),
    Err(e) => println!("{} Backend unreachable, sample data will be used: {}", "✗".red(), e),
  }
  Ok(())
}
