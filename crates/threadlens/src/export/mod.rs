//! Downloads for the current slice of a tab
//!
//! The backend renders exports from the filters of the last landed search,
//! so its file matches the rows on screen. When it can't, the file is
//! produced locally from those rows.

pub mod report;
pub mod table;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::client::Backend;
use crate::search::Source;
use crate::view::TabView;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
  pub path: PathBuf,
  pub bytes: usize,
  pub source: Source,
}

fn write_export(dir: &Path, filename: &str, body: &[u8], source: Source) -> Result<ExportOutcome> {
  fs::create_dir_all(dir).with_context(|| format!("Failed to create export directory {}", dir.display()))?;
  let path = dir.join(filename);
  fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
  info!("Wrote {} bytes to {}", body.len(), path.display());
  Ok(ExportOutcome { path, bytes: body.len(), source })
}

/// Save the tab's CSV download into `dir`
pub async fn export_data(backend: &dyn Backend, view: &TabView, dir: &Path) -> Result<ExportOutcome> {
  let tab = view.tab();
  let request = view.applied_filters().to_request(tab);

  match backend.export_data(&request).await {
    Ok(body) => write_export(dir, tab.export_filename(), &body, Source::Backend),
    Err(e) => {
      warn!("Export for {} generated locally: {}", tab, e);
      let csv = table::render(tab, view.rows())?;
      write_export(dir, tab.export_filename(), csv.as_bytes(), Source::Fallback { reason: e.to_string() })
    }
  }
}

/// Save the tab's insights report into `dir`
pub async fn export_insights(backend: &dyn Backend, view: &TabView, dir: &Path) -> Result<ExportOutcome> {
  let tab = view.tab();
  let request = view.applied_filters().to_request(tab);

  match backend.export_insights(&request).await {
    Ok(body) => write_export(dir, tab.insights_filename(), &body, Source::Backend),
    Err(e) => {
      warn!("Insights for {} generated locally: {}", tab, e);
      let text = report::render(view.rows());
      write_export(dir, tab.insights_filename(), text.as_bytes(), Source::Fallback { reason: e.to_string() })
    }
  }
}
