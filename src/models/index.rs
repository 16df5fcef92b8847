use serde::Serialize;
use std::hash::{Hash, Hasher};

use crate::es::payloads::{IndexAliases, IndexRoutingTable, IndexStats};
use crate::models::shard::Shard;
use crate::utils::{format_bytes, format_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexState {
    Open,
    Close,
}

impl IndexState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

/// Index sestavený z routing tabulky, index stats a aliasů
///
/// Rovnost jen podle `name`.
#[derive(Debug, Clone, Serialize)]
pub struct Index {
    pub name: String,
    pub state: IndexState,
    /// Interní index (začíná tečkou nebo podtržítkem)
    pub special: bool,
    pub num_of_shards: usize,
    pub num_of_replicas: usize,
    pub num_docs: u64,
    pub deleted_docs: u64,
    /// Velikost primary shardů
    pub size_in_bytes: u64,
    /// Velikost včetně replik
    pub total_size_in_bytes: u64,
    pub aliases: Vec<String>,
    /// Aspoň jedna kopie shardu není STARTED
    pub unhealthy: bool,
    pub shards: Vec<Shard>,
}

impl Index {
    /// Zavřený index: známe jen název
    pub fn closed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: IndexState::Close,
            special: is_special(name),
            num_of_shards: 0,
            num_of_replicas: 0,
            num_docs: 0,
            deleted_docs: 0,
            size_in_bytes: 0,
            total_size_in_bytes: 0,
            aliases: Vec::new(),
            unhealthy: false,
            shards: Vec::new(),
        }
    }

    /// Bez routing tabulky vznikne zavřený index, jinak otevřený
    pub fn new(
        name: &str,
        routing: Option<&IndexRoutingTable>,
        stats: Option<&IndexStats>,
        aliases: Option<&IndexAliases>,
    ) -> Self {
        let Some(routing) = routing else {
            return Self::closed(name);
        };

        let shards: Vec<Shard> = routing
            .shards
            .values()
            .flat_map(|group| group.iter().map(Shard::from))
            .collect();

        // Předpokládá stejný počet replik pro všechny primary shardy
        let num_of_replicas = routing
            .shards
            .values()
            .next()
            .map(|group| group.len().saturating_sub(1))
            .unwrap_or(0);

        let default_stats = IndexStats::default();
        let stats = stats.unwrap_or(&default_stats);

        Self {
            name: name.to_string(),
            state: IndexState::Open,
            special: is_special(name),
            num_of_shards: routing.shards.len(),
            num_of_replicas,
            num_docs: stats.primaries.docs.count,
            deleted_docs: stats.primaries.docs.deleted,
            size_in_bytes: stats.primaries.store.size_in_bytes,
            total_size_in_bytes: stats.total.store.size_in_bytes,
            aliases: aliases
                .map(|a| a.aliases.keys().cloned().collect())
                .unwrap_or_default(),
            unhealthy: shards.iter().any(|s| !s.is_started()),
            shards,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == IndexState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state == IndexState::Close
    }

    pub fn has_aliases(&self) -> bool {
        !self.aliases.is_empty()
    }

    /// Vrátí num_docs jako formátované číslo s mezerami
    pub fn num_docs_formatted(&self) -> String {
        format_number(self.num_docs)
    }

    pub fn size_formatted(&self) -> String {
        format_bytes(self.size_in_bytes)
    }

    pub fn total_size_formatted(&self) -> String {
        format_bytes(self.total_size_in_bytes)
    }
}

fn is_special(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Index {}

impl Hash for Index {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
