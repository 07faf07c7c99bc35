// Catalog models — the list of published articles and their titles.
//
// The catalog file is the same topic list the article generator works from:
// `{"topics": [{"slug": "...", "title": "...", ...}]}`. Only the id and title
// matter here; everything else in a topic record is ignored. Records may name
// the id `slug` or `id`; when both are present they must agree.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// A single publishable article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Slug-like identifier, unique across the catalog
    pub id: String,
    pub title: String,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Deserialize)]
struct TopicRecord {
    slug: Option<String>,
    id: Option<String>,
    title: String,
}

impl TopicRecord {
    fn into_item(self, index: usize) -> Result<ContentItem> {
        let id = match (self.slug, self.id) {
            (Some(slug), Some(id)) if slug != id => anyhow::bail!(
                "Topic {index} has conflicting slug \"{slug}\" and id \"{id}\""
            ),
            (Some(slug), _) => slug,
            (None, Some(id)) => id,
            (None, None) => anyhow::bail!("Topic {index} (\"{}\") has no slug or id", self.title),
        };
        Ok(ContentItem::new(id, self.title))
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    topics: Vec<TopicRecord>,
}

/// The ordered list of content items for one run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ContentItem>,
}

impl Catalog {
    /// Build a catalog from items, rejecting duplicate ids.
    pub fn new(items: Vec<ContentItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                anyhow::bail!("Duplicate content id in catalog: {}", item.id);
            }
        }
        Ok(Self { items })
    }

    /// Parse a catalog from the topic-list JSON format.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).context("Catalog is not a valid topic list")?;
        let items = file
            .topics
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_item(index))
            .collect::<Result<Vec<_>>>()?;
        Self::new(items)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid catalog: {}", path.display()))
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Id → title lookup, used when rendering link lists.
    pub fn titles(&self) -> HashMap<&str, &str> {
        self.items
            .iter()
            .map(|item| (item.id.as_str(), item.title.as_str()))
            .collect()
    }
}
