//! Typované tvary odpovědí, ze kterých se skládá snapshot clusteru.
//!
//! Všechny struktury mají `#[serde(default)]`: statistiky často zaostávají
//! za routing tabulkou, takže chybějící pole se doplní nulou / prázdnou
//! hodnotou už tady a modely pak nemusí nic ověřovat.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Cluster health response (`GET /_cluster/health`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClusterHealth {
    pub cluster_name: String,
    pub status: String,
    pub timed_out: bool,
    pub number_of_nodes: u32,
    pub number_of_data_nodes: u32,
    pub active_primary_shards: u32,
    pub active_shards: u32,
    pub relocating_shards: u32,
    pub initializing_shards: u32,
    pub unassigned_shards: u32,
}

/// Cluster state response (`GET /_cluster/state/...`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClusterState {
    pub cluster_name: String,
    pub master_node: Option<String>,
    pub nodes: BTreeMap<String, StateNode>,
    pub metadata: Metadata,
    pub routing_table: RoutingTable,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateNode {
    pub name: String,
    pub transport_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub indices: BTreeMap<String, IndexMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndexMetadata {
    /// "open" nebo "close"
    pub state: String,
}

impl IndexMetadata {
    pub fn is_closed(&self) -> bool {
        self.state == "close"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoutingTable {
    pub indices: BTreeMap<String, IndexRoutingTable>,
}

/// Routing jednoho indexu: číslo shardu -> všechny kopie (primary + repliky)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndexRoutingTable {
    pub shards: BTreeMap<u32, Vec<ShardRouting>>,
}

/// Jeden záznam routing tabulky
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShardRouting {
    pub primary: bool,
    pub shard: u32,
    pub state: Option<String>,
    pub node: Option<String>,
    pub relocating_node: Option<String>,
    pub index: String,
}

/// Node stats response (`GET /_nodes/stats`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodesStats {
    pub nodes: BTreeMap<String, NodeStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeStats {
    pub jvm: JvmStats,
    pub fs: FsStats,
    pub process: ProcessStats,
    pub os: OsStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JvmStats {
    pub uptime_in_millis: u64,
    pub mem: JvmMem,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JvmMem {
    pub heap_used_in_bytes: u64,
    pub heap_committed_in_bytes: u64,
    pub heap_used_percent: u64,
    pub heap_max_in_bytes: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FsStats {
    pub total: FsTotal,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FsTotal {
    pub total_in_bytes: u64,
    pub free_in_bytes: u64,
    pub available_in_bytes: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProcessStats {
    pub cpu: CpuStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OsStats {
    pub cpu: OsCpuStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub percent: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OsCpuStats {
    pub percent: i64,
    pub load_average: Option<LoadAverage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoadAverage {
    #[serde(rename = "1m")]
    pub one_minute: Option<f64>,
    #[serde(rename = "5m")]
    pub five_minutes: Option<f64>,
    #[serde(rename = "15m")]
    pub fifteen_minutes: Option<f64>,
}

/// Node info response (`GET /_nodes`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodesInfo {
    pub nodes: BTreeMap<String, NodeInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub name: String,
    pub version: String,
    pub transport_address: String,
    pub host: String,
    pub roles: Vec<String>,
    pub jvm: JvmInfo,
    pub os: OsInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JvmInfo {
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OsInfo {
    pub available_processors: u32,
}

/// Index stats response (`GET /_stats`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndicesStats {
    #[serde(rename = "_all")]
    pub all: IndexStats,
    pub indices: BTreeMap<String, IndexStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndexStats {
    pub primaries: StatsSection,
    pub total: StatsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatsSection {
    pub docs: DocsStats,
    pub store: StoreStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocsStats {
    pub count: u64,
    pub deleted: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreStats {
    pub size_in_bytes: u64,
}

/// Aliasy jednoho indexu z `GET /_aliases`; hodnoty (filtry, routing) nás nezajímají
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndexAliases {
    pub aliases: BTreeMap<String, Value>,
}

/// Odpověď `GET /_aliases`: název indexu -> aliasy
pub type Aliases = BTreeMap<String, IndexAliases>;

/// Všechny odpovědi potřebné pro jeden snapshot clusteru
#[derive(Debug, Clone, Default)]
pub struct ClusterPayloads {
    pub health: ClusterHealth,
    pub state: ClusterState,
    pub nodes_stats: NodesStats,
    pub nodes_info: NodesInfo,
    pub indices_stats: IndicesStats,
    pub aliases: Aliases,
}
