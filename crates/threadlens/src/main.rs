use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use threadlens::cli::{commands, FilterArgs};
use threadlens::filter::FilterGroup;
use threadlens::model::Tab;
use threadlens::sort::SortColumn;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "threadlens")]
#[command(
  about = "Threadlens - Reddit Comment Insights Explorer\nFilter, sort, export and chat over analysed Reddit comments"
)]
#[command(version)]
struct Cli {
  /// Log requests and fallbacks to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Search a tab and print one page of results
  Search {
    #[command(flatten)]
    filters: FilterArgs,
    /// Column to sort by
    #[arg(short, long, value_enum)]
    sort: Option<SortColumn>,
    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,
    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,
  },
  /// Download the filtered data as CSV, or the insights report
  Export {
    #[command(flatten)]
    filters: FilterArgs,
    /// Download the insights report instead of the data
    #[arg(long)]
    insights: bool,
    /// Directory to write the file to
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
  },
  /// Ask the AI about a tab's filtered comments
  Chat {
    #[command(flatten)]
    filters: FilterArgs,
    /// Override the tab's default task
    #[arg(long)]
    task: Option<String>,
    /// Print the saved conversation
    #[arg(long)]
    history: bool,
    /// Forget the saved conversation
    #[arg(long, conflicts_with = "history")]
    clear: bool,
    /// Question to ask
    prompt: Vec<String>,
  },
  /// Standalone Ask-AI conversations
  Ask {
    #[command(subcommand)]
    command: AskCommand,
  },
  /// Run or browse Reddit scrapes
  Scrape {
    #[command(subcommand)]
    command: ScrapeCommand,
  },
  /// List the filter options of a tab
  Options {
    #[arg(value_enum)]
    tab: Tab,
    #[arg(value_enum)]
    group: Option<FilterGroup>,
  },
  /// Show configuration and backend reachability
  Status,
}

#[derive(Subcommand)]
enum AskCommand {
  /// List saved conversations
  History,
  /// Send a message, starting a new conversation unless --session is given
  Send {
    #[arg(short, long)]
    session: Option<i64>,
    /// Prompt tag placed ahead of the message (repeatable)
    #[arg(short, long = "tag")]
    tags: Vec<String>,
    text: Vec<String>,
  },
  /// Delete a conversation
  Delete { id: i64 },
}

#[derive(Subcommand)]
enum ScrapeCommand {
  /// Scrape up to three subreddits
  Run {
    /// Comma-separated subreddit names
    subreddits: String,
    /// Posts to fetch per subreddit (1-1000)
    #[arg(allow_hyphen_values = true)]
    posts: String,
  },
  /// Show the comments of the most recent scrape
  Previous,
  /// Filter scraped comments by subreddit and emotion
  Filter {
    #[arg(long = "subreddit")]
    subreddits: Vec<String>,
    #[arg(long = "emotion")]
    emotions: Vec<String>,
  },
}

async fn handle(command: Command) -> Result<()> {
  match command {
    Command::Search { filters, sort, desc, page } => commands::search(&filters, sort, desc, page).await,
    Command::Export { filters, insights, out } => commands::export(&filters, insights, &out).await,
    Command::Chat { filters, task, history, clear, prompt } => {
      commands::chat(&filters, &prompt, task.as_deref(), history, clear).await
    }
    Command::Ask { command } => match command {
      AskCommand::History => commands::ask_list().await,
      AskCommand::Send { session, tags, text } => commands::ask_send(session, &tags, &text).await,
      AskCommand::Delete { id } => commands::ask_delete(id).await,
    },
    Command::Scrape { command } => match command {
      ScrapeCommand::Run { subreddits, posts } => commands::scrape_run(&subreddits, &posts).await,
      ScrapeCommand::Previous => commands::scrape_previous().await,
      ScrapeCommand::Filter { subreddits, emotions } => commands::scrape_filter(&subreddits, &emotions).await,
    },
    Command::Options { tab, group } => commands::options(tab, group),
    Command::Status => commands::status().await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let default = if cli.verbose { "threadlens=debug" } else { "threadlens=warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  handle(cli.command).await
}
