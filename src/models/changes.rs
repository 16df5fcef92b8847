use serde::Serialize;
use std::collections::HashSet;

use crate::models::cluster::Cluster;
use crate::models::index::Index;
use crate::models::node::Node;
use crate::utils::format_bytes;

/// Rozdíl mezi dvěma po sobě jdoucími snapshoty clusteru
///
/// Seznamy jsou `None`, dokud do nich nepřibude první položka; `Some` tedy
/// vždy znamená neprázdný seznam.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterChanges {
    node_joins: Option<Vec<Node>>,
    node_leaves: Option<Vec<Node>>,
    indices_created: Option<Vec<Index>>,
    indices_deleted: Option<Vec<Index>>,
    doc_delta: i64,
    data_delta: i64,
}

impl ClusterChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plný přepočet: co je v `current` a chybí v `previous` (a naopak),
    /// porovnává se podle id nodu a názvu indexu
    pub fn between(previous: &Cluster, current: &Cluster) -> Self {
        let mut changes = Self::new();

        let previous_nodes: HashSet<&str> = previous.nodes.iter().map(|n| n.id.as_str()).collect();
        let current_nodes: HashSet<&str> = current.nodes.iter().map(|n| n.id.as_str()).collect();

        for node in current.nodes.iter().filter(|n| !previous_nodes.contains(n.id.as_str())) {
            changes.add_joining_node(node.clone());
        }
        for node in previous.nodes.iter().filter(|n| !current_nodes.contains(n.id.as_str())) {
            changes.add_leaving_node(node.clone());
        }

        let previous_indices: HashSet<&str> = previous.indices.iter().map(|i| i.name.as_str()).collect();
        let current_indices: HashSet<&str> = current.indices.iter().map(|i| i.name.as_str()).collect();

        for index in current.indices.iter().filter(|i| !previous_indices.contains(i.name.as_str())) {
            changes.add_created_index(index.clone());
        }
        for index in previous.indices.iter().filter(|i| !current_indices.contains(i.name.as_str())) {
            changes.add_deleted_index(index.clone());
        }

        changes.set_doc_delta(signed_diff(current.num_docs, previous.num_docs));
        changes.set_data_delta(signed_diff(current.total_size_in_bytes, previous.total_size_in_bytes));

        changes
    }

    pub fn add_joining_node(&mut self, node: Node) {
        self.node_joins.get_or_insert_with(Vec::new).push(node);
    }

    pub fn add_leaving_node(&mut self, node: Node) {
        self.node_leaves.get_or_insert_with(Vec::new).push(node);
    }

    pub fn add_created_index(&mut self, index: Index) {
        self.indices_created.get_or_insert_with(Vec::new).push(index);
    }

    pub fn add_deleted_index(&mut self, index: Index) {
        self.indices_deleted.get_or_insert_with(Vec::new).push(index);
    }

    pub fn node_joins(&self) -> Option<&[Node]> {
        self.node_joins.as_deref()
    }

    pub fn node_leaves(&self) -> Option<&[Node]> {
        self.node_leaves.as_deref()
    }

    pub fn indices_created(&self) -> Option<&[Index]> {
        self.indices_created.as_deref()
    }

    pub fn indices_deleted(&self) -> Option<&[Index]> {
        self.indices_deleted.as_deref()
    }

    pub fn has_joins(&self) -> bool {
        self.node_joins.as_ref().is_some_and(|v| !v.is_empty())
    }

    pub fn has_leaves(&self) -> bool {
        self.node_leaves.as_ref().is_some_and(|v| !v.is_empty())
    }

    pub fn has_created_indices(&self) -> bool {
        self.indices_created.as_ref().is_some_and(|v| !v.is_empty())
    }

    pub fn has_deleted_indices(&self) -> bool {
        self.indices_deleted.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Počítají se jen přírůstky/úbytky nodů a indexů, ne delty
    pub fn has_changes(&self) -> bool {
        self.has_joins() || self.has_leaves() || self.has_created_indices() || self.has_deleted_indices()
    }

    pub fn set_doc_delta(&mut self, delta: i64) {
        self.doc_delta = delta;
    }

    pub fn doc_delta(&self) -> i64 {
        self.doc_delta
    }

    pub fn abs_doc_delta(&self) -> u64 {
        self.doc_delta.unsigned_abs()
    }

    pub fn set_data_delta(&mut self, delta: i64) {
        self.data_delta = delta;
    }

    pub fn data_delta(&self) -> i64 {
        self.data_delta
    }

    /// Absolutní hodnota datové delty jako human-readable velikost
    pub fn abs_data_delta(&self) -> String {
        format_bytes(self.data_delta.unsigned_abs())
    }
}

fn signed_diff(current: u64, previous: u64) -> i64 {
    (current as i128 - previous as i128).clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node::new(id, None, None)
    }

    #[test]
    fn test_initial_state() {
        let changes = ClusterChanges::new();

        assert!(changes.node_joins().is_none());
        assert!(changes.node_leaves().is_none());
        assert!(changes.indices_created().is_none());
        assert!(changes.indices_deleted().is_none());
        assert_eq!(changes.doc_delta(), 0);
        assert_eq!(changes.data_delta(), 0);
        assert!(!changes.has_changes());
    }

    #[test]
    fn test_node_changes() {
        let mut changes = ClusterChanges::new();
        changes.add_joining_node(node("node1"));
        changes.add_joining_node(node("node2"));

        assert!(changes.has_joins());
        assert!(!changes.has_leaves());
        assert_eq!(changes.node_joins().map(|n| n.len()), Some(2));
        assert!(changes.has_changes());

        let mut changes = ClusterChanges::new();
        changes.add_leaving_node(node("node1"));
        assert!(changes.has_leaves());
        assert_eq!(changes.node_leaves().unwrap()[0].id, "node1");
        assert!(changes.has_changes());
    }

    #[test]
    fn test_index_changes() {
        let mut changes = ClusterChanges::new();
        changes.add_created_index(Index::closed("test-index"));
        changes.add_created_index(Index::closed("test-index-2"));
        assert!(changes.has_created_indices());
        assert_eq!(changes.indices_created().unwrap().len(), 2);

        let mut changes = ClusterChanges::new();
        changes.add_deleted_index(Index::closed("test-index"));
        assert!(changes.has_deleted_indices());
        assert!(changes.has_changes());
    }

    #[test]
    fn test_deltas() {
        let mut changes = ClusterChanges::new();

        changes.set_doc_delta(-100);
        assert_eq!(changes.doc_delta(), -100);
        assert_eq!(changes.abs_doc_delta(), 100);

        changes.set_data_delta(-1048576);
        assert_eq!(changes.data_delta(), -1048576);
        assert_eq!(changes.abs_data_delta(), "1.00 MB");

        // Samotné delty nejsou "změna"
        assert!(!changes.has_changes());
    }

    #[test]
    fn test_signed_diff() {
        assert_eq!(signed_diff(100, 0), 100);
        assert_eq!(signed_diff(0, 100), -100);
        assert_eq!(signed_diff(u64::MAX, 0), i64::MAX);
    }
}
