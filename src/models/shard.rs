use serde::Serialize;
use std::fmt;

use crate::es::payloads::ShardRouting;

/// Stav kopie shardu v routing tabulce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShardState {
    Unassigned,
    Initializing,
    Started,
    Relocating,
}

impl ShardState {
    /// Neznámý nebo chybějící stav bereme jako nepřiřazený
    pub fn parse(state: Option<&str>) -> Self {
        match state {
            Some("STARTED") => Self::Started,
            Some("INITIALIZING") => Self::Initializing,
            Some("RELOCATING") => Self::Relocating,
            _ => Self::Unassigned,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unassigned => "UNASSIGNED",
            Self::Initializing => "INITIALIZING",
            Self::Started => "STARTED",
            Self::Relocating => "RELOCATING",
        }
    }
}

impl fmt::Display for ShardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Jedna kopie shardu (primary nebo replika)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shard {
    pub primary: bool,
    pub shard: u32,
    pub state: ShardState,
    pub node: Option<String>,
    pub relocating_node: Option<String>,
    pub index: String,
}

impl Shard {
    /// Klíč shardu pro diff a UI: `{node}_{shard}_{index}`
    pub fn id(&self) -> String {
        format!(
            "{}_{}_{}",
            self.node.as_deref().unwrap_or("unassigned"),
            self.shard,
            self.index
        )
    }

    pub fn is_started(&self) -> bool {
        self.state == ShardState::Started
    }

    pub fn is_unassigned(&self) -> bool {
        self.state == ShardState::Unassigned
    }
}

impl From<&ShardRouting> for Shard {
    fn from(routing: &ShardRouting) -> Self {
        Self {
            primary: routing.primary,
            shard: routing.shard,
            state: ShardState::parse(routing.state.as_deref()),
            node: routing.node.clone(),
            relocating_node: routing.relocating_node.clone(),
            index: routing.index.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routing(state: &str, node: Option<&str>, shard: u32, index: &str) -> ShardRouting {
        ShardRouting {
            primary: true,
            shard,
            state: Some(state.to_string()),
            node: node.map(str::to_string),
            relocating_node: None,
            index: index.to_string(),
        }
    }

    #[test]
    fn test_shard_from_routing() {
        let shard = Shard::from(&routing("STARTED", Some("node1"), 0, "test-index"));

        assert!(shard.primary);
        assert_eq!(shard.shard, 0);
        assert_eq!(shard.state, ShardState::Started);
        assert_eq!(shard.node.as_deref(), Some("node1"));
        assert_eq!(shard.index, "test-index");
    }

    #[test]
    fn test_shard_id() {
        assert_eq!(Shard::from(&routing("STARTED", Some("node1"), 2, "my-index")).id(), "node1_2_my-index");
        assert_eq!(Shard::from(&routing("STARTED", Some("node1"), 99, "test")).id(), "node1_99_test");
        assert_eq!(Shard::from(&routing("STARTED", Some("node1"), 0, ".kibana_1")).id(), "node1_0_.kibana_1");
    }

    #[test]
    fn test_unassigned_shard() {
        let shard = Shard::from(&routing("UNASSIGNED", None, 0, "test-index"));

        assert!(shard.is_unassigned());
        assert_eq!(shard.node, None);
        assert_eq!(shard.id(), "unassigned_0_test-index");
    }

    #[test]
    fn test_state_parsing() {
        assert_eq!(ShardState::parse(Some("INITIALIZING")), ShardState::Initializing);
        assert_eq!(ShardState::parse(Some("RELOCATING")), ShardState::Relocating);
        assert_eq!(ShardState::parse(Some("garbage")), ShardState::Unassigned);
        assert_eq!(ShardState::parse(None), ShardState::Unassigned);
        assert_eq!(ShardState::Started.to_string(), "STARTED");
    }
}
