// Site status display — catalog size, cluster coverage, link progress.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::catalog::{Catalog, ClusterTable};
use crate::config::Config;
use crate::inject::related::RELATED_MARKER;

/// Counts shown by `interlink status`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteStatus {
    pub articles_in_catalog: usize,
    pub clusters: usize,
    pub unclustered: Vec<String>,
    /// (cluster, id) pairs naming ids that aren't in the catalog
    pub stale_members: Vec<(String, String)>,
    pub articles_on_disk: usize,
    pub articles_linked: usize,
}

/// Gather status counts. Only reads files.
pub fn collect(config: &Config, catalog: &Catalog, clusters: &ClusterTable) -> Result<SiteStatus> {
    let mut on_disk = 0;
    let mut linked = 0;
    for item in catalog.items() {
        let path = config.article_path(&item.id);
        if !path.exists() {
            continue;
        }
        on_disk += 1;
        let html = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read article: {}", path.display()))?;
        if html.contains(RELATED_MARKER) {
            linked += 1;
        }
    }

    Ok(SiteStatus {
        articles_in_catalog: catalog.len(),
        clusters: clusters.len(),
        unclustered: clusters
            .unclustered(catalog)
            .into_iter()
            .map(String::from)
            .collect(),
        stale_members: clusters
            .stale_members(catalog)
            .into_iter()
            .map(|(c, id)| (c.to_string(), id.to_string()))
            .collect(),
        articles_on_disk: on_disk,
        articles_linked: linked,
    })
}

/// Display system status to the terminal.
pub fn show(status: &SiteStatus, config: &Config) {
    println!("Site: {}", config.site_dir.display());
    println!("Catalog: {} articles", status.articles_in_catalog);
    println!("Clusters: {}", status.clusters);

    if status.unclustered.is_empty() {
        println!("Unclustered articles: none");
    } else {
        println!(
            "Unclustered articles: {} {}",
            status.unclustered.len(),
            "(these get no related links)".dimmed()
        );
        for id in &status.unclustered {
            println!("  {id}");
        }
    }

    if !status.stale_members.is_empty() {
        println!(
            "{} {} cluster entries are not in the catalog:",
            "Warning:".yellow(),
            status.stale_members.len()
        );
        for (cluster, id) in &status.stale_members {
            println!("  {cluster}: {id}");
        }
    }

    println!(
        "Articles on disk: {} of {}",
        status.articles_on_disk, status.articles_in_catalog
    );
    println!(
        "Related links: {} of {} pages",
        status.articles_linked, status.articles_on_disk
    );
    if status.articles_linked < status.articles_on_disk {
        println!("  Run `interlink link` to add the missing related sections");
    }
}
