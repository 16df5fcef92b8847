use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::es::payloads::ClusterPayloads;
use crate::models::changes::ClusterChanges;
use crate::models::index::Index;
use crate::models::node::Node;
use crate::models::shard::Shard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    Green,
    Yellow,
    Red,
}

impl ClusterStatus {
    /// Neznámý status bereme jako red
    pub fn parse(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            _ => Self::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot clusteru z jednoho pollu
///
/// Staví se vždy znovu z odpovědí API. Předchozí snapshot je potřeba jen
/// při sestavení, kvůli výpočtu [`ClusterChanges`]; dál se nedrží.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub name: String,
    pub status: ClusterStatus,
    pub fetched_at: DateTime<Utc>,
    pub master_node: Option<String>,

    // Health
    pub timed_out: bool,
    pub number_of_data_nodes: u32,
    pub active_primary_shards: u32,
    pub active_shards: u32,
    pub relocating_shards: u32,
    pub initializing_shards: u32,
    pub unassigned_shards: u32,

    pub nodes: Vec<Node>,
    pub indices: Vec<Index>,

    // Součty přes indexy
    pub num_docs: u64,
    pub total_size_in_bytes: u64,
    pub special_indices: usize,
    pub closed_indices: usize,

    pub changes: ClusterChanges,
}

impl Cluster {
    pub fn new(payloads: &ClusterPayloads, previous: Option<&Cluster>) -> Self {
        Self::at(payloads, Utc::now(), previous)
    }

    pub fn at(
        payloads: &ClusterPayloads,
        fetched_at: DateTime<Utc>,
        previous: Option<&Cluster>,
    ) -> Self {
        let health = &payloads.health;
        let state = &payloads.state;

        let name = if state.cluster_name.is_empty() {
            health.cluster_name.clone()
        } else {
            state.cluster_name.clone()
        };

        let nodes: Vec<Node> = state
            .nodes
            .iter()
            .map(|(id, state_node)| {
                let mut node = Node::new(
                    id,
                    payloads.nodes_stats.nodes.get(id),
                    payloads.nodes_info.nodes.get(id),
                );
                // Node info může chybět, pokud se node právě připojil
                if node.name.is_empty() {
                    node.name = state_node.name.clone();
                }
                if node.transport_address.is_empty() {
                    node.transport_address = state_node.transport_address.clone();
                }
                if state.master_node.as_deref() == Some(id.as_str()) {
                    node.set_current_master();
                }
                node
            })
            .collect();

        let index_names: BTreeSet<&String> = state
            .metadata
            .indices
            .keys()
            .chain(state.routing_table.indices.keys())
            .collect();

        let indices: Vec<Index> = index_names
            .into_iter()
            .map(|name| {
                let closed = state
                    .metadata
                    .indices
                    .get(name)
                    .is_some_and(|meta| meta.is_closed());
                if closed {
                    return Index::closed(name);
                }
                Index::new(
                    name,
                    state.routing_table.indices.get(name),
                    payloads.indices_stats.indices.get(name),
                    payloads.aliases.get(name),
                )
            })
            .collect();

        let mut cluster = Self {
            name,
            status: ClusterStatus::parse(&health.status),
            fetched_at,
            master_node: state.master_node.clone(),
            timed_out: health.timed_out,
            number_of_data_nodes: health.number_of_data_nodes,
            active_primary_shards: health.active_primary_shards,
            active_shards: health.active_shards,
            relocating_shards: health.relocating_shards,
            initializing_shards: health.initializing_shards,
            unassigned_shards: health.unassigned_shards,
            num_docs: indices.iter().map(|i| i.num_docs).sum(),
            total_size_in_bytes: indices.iter().map(|i| i.total_size_in_bytes).sum(),
            special_indices: indices.iter().filter(|i| i.special).count(),
            closed_indices: indices.iter().filter(|i| i.is_closed()).count(),
            nodes,
            indices,
            changes: ClusterChanges::new(),
        };

        if let Some(previous) = previous {
            cluster.compute_changes(previous);
        }

        cluster
    }

    /// Po reconnectu na jiný cluster se nic neporovnává
    pub fn compute_changes(&mut self, previous: &Cluster) {
        self.changes = if previous.name == self.name {
            ClusterChanges::between(previous, self)
        } else {
            ClusterChanges::new()
        };
    }

    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_indices(&self) -> usize {
        self.indices.len()
    }

    pub fn open_indices(&self) -> usize {
        self.indices.len() - self.closed_indices
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indices.iter().find(|i| i.name == name)
    }

    pub fn current_master(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_current_master())
    }

    pub fn shards(&self) -> impl Iterator<Item = &Shard> {
        self.indices.iter().flat_map(|i| i.shards.iter())
    }

    pub fn unassigned(&self) -> Vec<&Shard> {
        self.shards().filter(|s| s.is_unassigned()).collect()
    }

    pub fn shards_for_node<'a>(&'a self, node_id: &'a str) -> Vec<&'a Shard> {
        self.shards()
            .filter(|s| s.node.as_deref() == Some(node_id))
            .collect()
    }

    pub fn shards_for_index(&self, name: &str) -> Vec<&Shard> {
        self.index(name)
            .map(|i| i.shards.iter().collect())
            .unwrap_or_default()
    }
}
