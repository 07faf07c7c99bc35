// Cluster table — hand-curated topical groupings of article ids.
//
// The table is stored as a JSON object of `cluster name -> [id, ...]`.
// Declaration order is significant: it decides which related links come
// first, so the object is read with key order preserved.

use std::path::Path;

use anyhow::{Context, Result};

use super::models::Catalog;

/// A named, ordered group of content ids sharing a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub name: String,
    pub members: Vec<String>,
}

impl Cluster {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// All clusters in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ClusterTable {
    clusters: Vec<Cluster>,
}

impl ClusterTable {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    /// Parse the `{"name": [ids...]}` JSON format.
    pub fn from_json(json: &str) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).context("Cluster table must be a JSON object")?;

        let mut clusters = Vec::with_capacity(object.len());
        for (name, value) in object {
            let members: Vec<String> = serde_json::from_value(value)
                .with_context(|| format!("Cluster \"{name}\" must be a list of ids"))?;
            clusters.push(Cluster { name, members });
        }
        Ok(Self { clusters })
    }

    /// Load a cluster table file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cluster table: {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Invalid cluster table: {}", path.display()))
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Cluster members that don't exist in the catalog, as (cluster, id) pairs.
    ///
    /// These are harmless to the mapper (they're dropped) but usually mean an
    /// article was renamed or never generated.
    pub fn stale_members<'a>(&'a self, catalog: &Catalog) -> Vec<(&'a str, &'a str)> {
        self.clusters
            .iter()
            .flat_map(move |c| {
                c.members
                    .iter()
                    .filter(move |id| !catalog.contains(id))
                    .map(move |id| (c.name.as_str(), id.as_str()))
            })
            .collect()
    }

    /// Catalog ids that belong to no cluster at all.
    pub fn unclustered<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        catalog
            .items()
            .iter()
            .filter(|item| {
                !self
                    .clusters
                    .iter()
                    .any(|c| c.members.iter().any(|m| *m == item.id))
            })
            .map(|item| item.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_is_kept() {
        let json = r#"{"zeta": ["a"], "alpha": ["b", "a"], "mid": []}"#;
        let table = ClusterTable::from_json(json).unwrap();
        let names: Vec<&str> = table.clusters().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(table.clusters()[1].members, vec!["b", "a"]);
    }

    #[test]
    fn test_non_list_cluster_is_an_error() {
        let err = ClusterTable::from_json(r#"{"bad": "a"}"#).unwrap_err();
        assert!(format!("{err:#}").contains("bad"));
    }
}
