use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::inject::related::SectionStyle;

/// Central configuration loaded from environment variables.
///
/// Everything has a default relative to the site directory, so running the
/// tool from the site root with no .env works out of the box.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the static site (INTERLINK_SITE_DIR, default ".")
    pub site_dir: PathBuf,
    /// Topic list the articles were generated from
    pub catalog_path: PathBuf,
    /// Cluster table (`{"cluster": [ids...]}`)
    pub clusters_path: PathBuf,
    /// Verified citation sources
    pub citations_path: PathBuf,
    /// Directory holding one `<id>/index.html` per article
    pub articles_dir: PathBuf,
    /// How the related-articles block is rendered
    pub section: SectionStyle,
}

impl Config {
    /// Default layout rooted at `site_dir`.
    pub fn for_site(site_dir: impl Into<PathBuf>) -> Self {
        let site_dir = site_dir.into();
        Self {
            catalog_path: site_dir.join("data").join("article_topics.json"),
            clusters_path: site_dir.join("data").join("clusters.json"),
            citations_path: site_dir.join("data").join("citation_db.json"),
            articles_dir: site_dir.join("articles"),
            section: SectionStyle::default(),
            site_dir,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Relative paths in the path variables resolve against the site directory.
    pub fn load() -> Result<Self> {
        let site_dir = env::var("INTERLINK_SITE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let mut config = Self::for_site(site_dir);

        if let Ok(p) = env::var("INTERLINK_CATALOG") {
            config.catalog_path = config.resolve(&p);
        }
        if let Ok(p) = env::var("INTERLINK_CLUSTERS") {
            config.clusters_path = config.resolve(&p);
        }
        if let Ok(p) = env::var("INTERLINK_CITATIONS") {
            config.citations_path = config.resolve(&p);
        }
        if let Ok(p) = env::var("INTERLINK_ARTICLES_DIR") {
            config.articles_dir = config.resolve(&p);
        }
        if let Ok(heading) = env::var("INTERLINK_RELATED_HEADING") {
            config.section.heading = heading;
        }
        if let Ok(prefix) = env::var("INTERLINK_ARTICLE_URL_PREFIX") {
            config.section.url_prefix = prefix;
        }

        Ok(config)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.site_dir.join(path)
        }
    }

    /// Path to an article page by id.
    pub fn article_path(&self, id: &str) -> PathBuf {
        self.articles_dir.join(id).join("index.html")
    }

    /// Check that the catalog and cluster table exist.
    /// Call this before any operation that builds the related map.
    pub fn require_catalog(&self) -> Result<()> {
        if !self.catalog_path.exists() {
            anyhow::bail!(
                "Catalog not found at {}\n\
                 Set INTERLINK_CATALOG or INTERLINK_SITE_DIR in your .env file.",
                self.catalog_path.display()
            );
        }
        if !self.clusters_path.exists() {
            anyhow::bail!(
                "Cluster table not found at {}\n\
                 Set INTERLINK_CLUSTERS in your .env file.",
                self.clusters_path.display()
            );
        }
        Ok(())
    }

    /// Check that the citation database exists.
    pub fn require_citations(&self) -> Result<()> {
        if !self.citations_path.exists() {
            anyhow::bail!(
                "Citation database not found at {}\n\
                 Set INTERLINK_CITATIONS in your .env file.",
                self.citations_path.display()
            );
        }
        Ok(())
    }

    /// Check that the articles directory exists.
    pub fn require_articles(&self) -> Result<()> {
        if !self.articles_dir.is_dir() {
            anyhow::bail!(
                "Articles directory not found at {}\n\
                 Set INTERLINK_ARTICLES_DIR or INTERLINK_SITE_DIR in your .env file.",
                self.articles_dir.display()
            );
        }
        Ok(())
    }
}
