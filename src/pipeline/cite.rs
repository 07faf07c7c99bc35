// Citation pipeline: link verified sources across the article tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use super::{article_name, collect_targets};
use crate::config::Config;
use crate::inject::citations::{apply_citations, CitationChange, CitationEntry};

/// Links added to one file.
#[derive(Debug, Clone)]
pub struct FileCitations {
    pub path: PathBuf,
    pub article: String,
    pub changes: Vec<CitationChange>,
}

#[derive(Debug, Clone, Default)]
pub struct CiteReport {
    /// Only files that received at least one link
    pub files: Vec<FileCitations>,
    pub dry_run: bool,
}

impl CiteReport {
    pub fn total_changes(&self) -> usize {
        self.files.iter().map(|f| f.changes.len()).sum()
    }
}

/// True for the article listing page (`articles/index.html`), which is
/// generated separately and never gets citation links.
fn is_listing_page(html: &Path) -> bool {
    html.file_name().is_some_and(|n| n == "index.html")
        && html
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|n| n == "articles")
}

/// Run the citation pipeline over `target` (or every article).
pub fn run(
    config: &Config,
    entries: &[CitationEntry],
    target: Option<&Path>,
    dry_run: bool,
) -> Result<CiteReport> {
    let mut report = CiteReport {
        files: Vec::new(),
        dry_run,
    };

    for html_path in collect_targets(&config.articles_dir, target)? {
        if is_listing_page(&html_path) {
            continue;
        }

        let original = std::fs::read_to_string(&html_path)
            .with_context(|| format!("Failed to read article: {}", html_path.display()))?;
        let (updated, changes) = apply_citations(&original, entries);
        if changes.is_empty() {
            continue;
        }

        if !dry_run && updated != original {
            std::fs::write(&html_path, &updated)
                .with_context(|| format!("Failed to write article: {}", html_path.display()))?;
        }

        report.files.push(FileCitations {
            article: article_name(&html_path),
            path: html_path,
            changes,
        });
    }

    info!(
        files = report.files.len(),
        links = report.total_changes(),
        dry_run,
        "Citation pass finished"
    );
    Ok(report)
}
