// Statistics audit pipeline: scan the article tree for claims to verify.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{article_name, collect_targets};
use crate::audit::stats::{check_text, StatsHit, StatsRules};
use crate::config::Config;

/// An article with at least one flagged line.
#[derive(Debug, Clone)]
pub struct FlaggedArticle {
    pub article: String,
    pub hits: Vec<StatsHit>,
}

/// Run the audit over `target` (or every article). Read-only.
pub fn run(config: &Config, rules: &StatsRules, target: Option<&Path>) -> Result<Vec<FlaggedArticle>> {
    if target.is_none() {
        config.require_articles()?;
    }

    let mut flagged = Vec::new();
    for html_path in collect_targets(&config.articles_dir, target)? {
        let text = std::fs::read_to_string(&html_path)
            .with_context(|| format!("Failed to read article: {}", html_path.display()))?;
        let hits = check_text(&text, rules);
        if !hits.is_empty() {
            flagged.push(FlaggedArticle {
                article: article_name(&html_path),
                hits,
            });
        }
    }

    info!(
        articles = flagged.len(),
        hits = flagged.iter().map(|f| f.hits.len()).sum::<usize>(),
        "Statistics audit finished"
    );
    Ok(flagged)
}
