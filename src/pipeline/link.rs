// Related-links pipeline: add a related-articles block to every article page.
//
// Walks the catalog in order, looks up each article's related list, and
// injects the block into `articles/<id>/index.html`. Articles that aren't on
// disk yet are counted as missing; articles with no related ids, pages that
// already carry the block, and pages without an anchor point are skipped.

use std::collections::HashMap;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::inject::related::{inject_related, Injection};
use crate::related::RelatedMap;

/// What happened to one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Block added with this many links
    Linked(usize),
    /// Page already has a related block
    AlreadyLinked,
    /// The mapper found nothing related
    NoRelated,
    /// Page has neither a disclaimer box nor </main>
    NoAnchor,
    /// No page on disk for this id
    Missing,
}

#[derive(Debug, Clone)]
pub struct ArticleResult {
    pub id: String,
    pub outcome: LinkOutcome,
}

/// Results for a whole run, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    pub results: Vec<ArticleResult>,
    pub dry_run: bool,
}

impl LinkReport {
    fn count(&self, pred: impl Fn(&LinkOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Linked(_)))
    }

    /// Pages on disk that were left unchanged.
    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                LinkOutcome::AlreadyLinked | LinkOutcome::NoRelated | LinkOutcome::NoAnchor
            )
        })
    }

    pub fn missing(&self) -> usize {
        self.count(|o| *o == LinkOutcome::Missing)
    }
}

/// Run the related-links pipeline.
///
/// With `dry_run`, pages are read and outcomes computed but nothing is written.
pub fn run(
    config: &Config,
    catalog: &Catalog,
    related_map: &RelatedMap,
    dry_run: bool,
) -> Result<LinkReport> {
    let titles: HashMap<&str, &str> = catalog.titles();
    let mut report = LinkReport {
        results: Vec::with_capacity(catalog.len()),
        dry_run,
    };

    let pb = ProgressBar::new(catalog.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Linking [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for item in catalog.items() {
        pb.inc(1);
        let outcome = link_article(config, &item.id, related_map.get(&item.id), &titles, dry_run)?;
        debug!(id = %item.id, outcome = ?outcome, "Article processed");
        report.results.push(ArticleResult {
            id: item.id.clone(),
            outcome,
        });
    }
    pb.finish_and_clear();

    info!(
        updated = report.updated(),
        skipped = report.skipped(),
        missing = report.missing(),
        dry_run,
        "Related-links pass finished"
    );
    Ok(report)
}

fn link_article(
    config: &Config,
    id: &str,
    related: &[String],
    titles: &HashMap<&str, &str>,
    dry_run: bool,
) -> Result<LinkOutcome> {
    let path = config.article_path(id);
    if !path.exists() {
        return Ok(LinkOutcome::Missing);
    }
    if related.is_empty() {
        return Ok(LinkOutcome::NoRelated);
    }

    let html = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read article: {}", path.display()))?;

    match inject_related(&html, related, titles, &config.section) {
        Injection::Inserted(updated) => {
            if !dry_run {
                std::fs::write(&path, updated)
                    .with_context(|| format!("Failed to write article: {}", path.display()))?;
            }
            Ok(LinkOutcome::Linked(related.len()))
        }
        Injection::AlreadyPresent => Ok(LinkOutcome::AlreadyLinked),
        Injection::NoAnchor => Ok(LinkOutcome::NoAnchor),
    }
}
