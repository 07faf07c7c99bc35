// Cluster-based related-content mapper.
//
// For every item in the catalog, walk the clusters it belongs to (in table
// order) and collect the other members (in cluster order), skipping the item
// itself, ids missing from the catalog, and ids already collected. The first
// MAX_RELATED candidates are kept.
//
// Same-cluster items are the only candidates, so an item with no clusters
// gets an empty list. That's a normal outcome, not an error.

use std::collections::{HashMap, HashSet};

use crate::catalog::{ClusterTable, ContentItem};

/// Upper bound on the length of any related list.
pub const MAX_RELATED: usize = 4;

/// Computed id → related ids mapping, iterable in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedMap {
    order: Vec<String>,
    related: HashMap<String, Vec<String>>,
}

impl RelatedMap {
    /// Related ids for `id`. Unknown ids get an empty slice.
    pub fn get(&self, id: &str) -> &[String] {
        self.related.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.get(id)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of items that ended up with no related links.
    pub fn empty_count(&self) -> usize {
        self.related.values().filter(|r| r.is_empty()).count()
    }

    /// JSON object in catalog order: `{"id": ["related", ...], ...}`.
    pub fn to_json(&self) -> serde_json::Value {
        let object: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(id, related)| (id.to_string(), serde_json::json!(related)))
            .collect();
        serde_json::Value::Object(object)
    }
}

/// Build the related map for a catalog.
///
/// Pure and deterministic: the membership index is rebuilt on every call from
/// the arguments, nothing is cached between runs.
pub fn build_related_map(catalog: &[ContentItem], clusters: &ClusterTable) -> RelatedMap {
    let known: HashSet<&str> = catalog.iter().map(|item| item.id.as_str()).collect();

    // Reverse index: id -> indices of the clusters it belongs to, in table order
    let mut memberships: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, cluster) in clusters.clusters().iter().enumerate() {
        for member in &cluster.members {
            if known.contains(member.as_str()) {
                let entry = memberships.entry(member.as_str()).or_default();
                // An id listed twice in one cluster still counts as one membership
                if entry.last() != Some(&idx) {
                    entry.push(idx);
                }
            }
        }
    }

    let mut map = RelatedMap::default();

    for item in catalog {
        let subject = item.id.as_str();
        let mut candidates: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for &idx in memberships.get(subject).map(Vec::as_slice).unwrap_or(&[]) {
            for member in &clusters.clusters()[idx].members {
                let member = member.as_str();
                if member != subject && known.contains(member) && seen.insert(member) {
                    candidates.push(member.to_string());
                }
            }
        }

        candidates.truncate(MAX_RELATED);

        map.order.push(item.id.clone());
        map.related.insert(item.id.clone(), candidates);
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Cluster;

    fn items(ids: &[&str]) -> Vec<ContentItem> {
        ids.iter().map(|id| ContentItem::new(*id, id.to_uppercase())).collect()
    }

    #[test]
    fn test_single_cluster() {
        let catalog = items(&["a", "b", "c", "d", "e"]);
        let clusters = ClusterTable::new(vec![Cluster::new("k", ["a", "b", "c"])]);
        let map = build_related_map(&catalog, &clusters);

        assert_eq!(map.get("a"), ["b", "c"]);
        assert_eq!(map.get("c"), ["a", "b"]);
        assert!(map.get("d").is_empty());
        assert_eq!(map.empty_count(), 2);
    }

    #[test]
    fn test_iter_follows_catalog_order() {
        let catalog = items(&["c", "a", "b"]);
        let clusters = ClusterTable::new(vec![Cluster::new("k", ["a", "b", "c"])]);
        let map = build_related_map(&catalog, &clusters);
        let ids: Vec<&str> = map.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_member_within_cluster() {
        let catalog = items(&["a", "b"]);
        let clusters = ClusterTable::new(vec![Cluster::new("k", ["a", "b", "a", "b"])]);
        let map = build_related_map(&catalog, &clusters);
        assert_eq!(map.get("a"), ["b"]);
        assert_eq!(map.get("b"), ["a"]);
    }

    #[test]
    fn test_to_json_keeps_order() {
        let catalog = items(&["b", "a"]);
        let clusters = ClusterTable::new(vec![Cluster::new("k", ["a", "b"])]);
        let json = build_related_map(&catalog, &clusters).to_json().to_string();
        assert_eq!(json, r#"{"b":["a"],"a":["b"]}"#);
    }
}
