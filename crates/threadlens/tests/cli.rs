use assert_cmd::prelude::*;
use assert_fs::prelude::*;

use predicates::prelude::*;
use predicates::str::contains;
use std::process::Command;

/// `threadlens` pointed at a backend that refuses connections, with state in `home`
fn threadlens_cmd(home: &assert_fs::TempDir) -> Command {
  let mut cmd = Command::cargo_bin("threadlens").expect("binary exists");
  cmd
    .env("THREADLENS_CONFIG", home.path().join("missing.yaml"))
    .env("THREADLENS_HOME", home.path())
    .env("THREADLENS_BACKEND_URL", "http://127.0.0.1:9")
    .env("THREADLENS_SCRAPER_URL", "http://127.0.0.1:9/")
    .env("THREADLENS_TIMEOUT_SECS", "2")
    .env("NO_COLOR", "1")
    .env_remove("RUST_LOG");
  cmd
}

#[test]
fn test_search_falls_back_to_samples() {
  let home = assert_fs::TempDir::new().unwrap();

  threadlens_cmd(&home)
    .args(["search", "painpoints", "--keyword", "sleep"])
    .assert()
    .success()
    .stdout(contains("showing sample data").and(contains("u/chronic_sufferer")).and(contains("Showing 1-1 of 1")));

  home.close().unwrap();
}

#[test]
fn test_search_with_no_matches_says_so() {
  let home = assert_fs::TempDir::new().unwrap();

  threadlens_cmd(&home)
    .args(["search", "questions", "--keyword", "zzzz-no-such-text"])
    .assert()
    .success()
    .stdout(contains("No results"));

  threadlens_cmd(&home)
    .args(["search", "painpoints", "--intensity", "100"])
    .assert()
    .success()
    .stdout(contains("No results"));
}

#[test]
fn test_invalid_filters_exit_non_zero() {
  let home = assert_fs::TempDir::new().unwrap();

  threadlens_cmd(&home)
    .args(["search", "painpoints", "--intensity", "150"])
    .assert()
    .failure()
    .stderr(contains("Intensity must be between 0 and 100"));

  threadlens_cmd(&home)
    .args(["search", "questions", "--practitioner", "nurse"])
    .assert()
    .failure()
    .stderr(contains("not available"));

  threadlens_cmd(&home).args(["search", "questions", "--page", "0"]).assert().failure();
}

#[test]
fn test_export_writes_local_csv() {
  let home = assert_fs::TempDir::new().unwrap();
  let out = home.child("downloads");

  threadlens_cmd(&home)
    .args(["export", "questions", "--intensity", "0", "--out"])
    .arg(out.path())
    .assert()
    .success()
    .stdout(contains("generated locally").and(contains("questions-data.csv")));

  out
    .child("questions-data.csv")
    .assert(predicate::str::starts_with("Author,Timestamp,Subreddit,Comment,Question,Emotion,Upvotes,Intensity,Topic\n"));

  threadlens_cmd(&home)
    .args(["export", "metaphors", "--insights", "--out"])
    .arg(out.path())
    .assert()
    .success();
  out.child("metaphors-insights.csv").assert(predicate::str::starts_with("Top Insights"));
}

#[test]
fn test_chat_apologises_and_keeps_transcript_per_tab() {
  let home = assert_fs::TempDir::new().unwrap();

  threadlens_cmd(&home)
    .args(["chat", "painpoints", "what", "hurts?"])
    .assert()
    .success()
    .stdout(contains("Sorry, I couldn't get an answer. Please try again."));

  home.child("transcripts/chat-painpoints.json").assert(predicate::path::exists());
  home.child("transcripts/chat-questions.json").assert(predicate::path::missing());

  threadlens_cmd(&home)
    .args(["chat", "painpoints", "--history"])
    .assert()
    .success()
    .stdout(contains("what hurts?"));

  threadlens_cmd(&home)
    .args(["chat", "questions", "--history"])
    .assert()
    .success()
    .stdout(contains("No messages yet."));

  threadlens_cmd(&home).args(["chat", "painpoints", "--clear"]).assert().success();
  home.child("transcripts/chat-painpoints.json").assert(predicate::path::missing());
}

#[test]
fn test_scrape_validation_blocks_requests() {
  let home = assert_fs::TempDir::new().unwrap();

  threadlens_cmd(&home)
    .args(["scrape", "run", "a,b,c,d", "10"])
    .assert()
    .failure()
    .stderr(contains("Maximum 3 subreddits allowed"));

  threadlens_cmd(&home)
    .args(["scrape", "run", "health", "1001"])
    .assert()
    .failure()
    .stderr(contains("Post limit must be between 1 and 1000"));

  threadlens_cmd(&home)
    .args(["scrape", "run", "health", "0"])
    .assert()
    .failure()
    .stderr(contains("Post limit must be between 1 and 1000"));
}

#[test]
fn test_scrape_falls_back_to_sample_comments() {
  let home = assert_fs::TempDir::new().unwrap();

  threadlens_cmd(&home)
    .args(["scrape", "run", "health", "2"])
    .assert()
    .success()
    .stdout(contains("estimated 20s").and(contains("15 comments")));

  threadlens_cmd(&home)
    .args(["scrape", "filter", "--subreddit", "wellness"])
    .assert()
    .success()
    .stdout(contains("r/wellness").and(contains("r/fitness").not()));
}

#[test]
fn test_options_lists_fixed_vocabularies() {
  let home = assert_fs::TempDir::new().unwrap();

  threadlens_cmd(&home)
    .args(["options", "practitioners", "practitioner"])
    .assert()
    .success()
    .stdout(contains("nurse"));

  threadlens_cmd(&home)
    .args(["options", "painpoints"])
    .assert()
    .success()
    .stdout(contains("subreddit").and(contains("r/chronicpain")).and(contains("practitioner").not()));

  threadlens_cmd(&home).args(["options", "questions", "practitioner"]).assert().failure();
}

#[test]
fn test_status_reports_unreachable_backend() {
  let home = assert_fs::TempDir::new().unwrap();

  threadlens_cmd(&home)
    .arg("status")
    .assert()
    .success()
    .stdout(contains("http://127.0.0.1:9").and(contains("Backend unreachable")));
}
