use anyhow::Result;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::client::EsClient;
use super::payloads::{Aliases, ClusterHealth, ClusterPayloads, ClusterState, IndicesStats, NodesInfo, NodesStats};
use crate::error::ApiError;
use crate::monitor::ClusterSource;

/// Z cluster state bereme jen to, co model potřebuje (mappingy mohou být obrovské)
const CLUSTER_STATE_PATH: &str = "/_cluster/state/master_node,nodes,routing_table,metadata\
    ?filter_path=cluster_name,master_node,nodes.*.name,nodes.*.transport_address,routing_table,metadata.indices.*.state";

/// Cat API dostupná z konzole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatApi {
    Aliases,
    Count,
    Master,
    Plugins,
    Recovery,
}

impl CatApi {
    pub const ALL: [CatApi; 5] = [Self::Aliases, Self::Count, Self::Master, Self::Plugins, Self::Recovery];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aliases => "aliases",
            Self::Count => "count",
            Self::Master => "master",
            Self::Plugins => "plugins",
            Self::Recovery => "recovery",
        }
    }
}

impl FromStr for CatApi {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|api| api.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ApiError::UnknownCatApi(s.to_string()))
    }
}

impl fmt::Display for CatApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HotThreadsType {
    #[default]
    Cpu,
    Wait,
    Block,
}

impl HotThreadsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Wait => "wait",
            Self::Block => "block",
        }
    }
}

impl FromStr for HotThreadsType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "wait" => Ok(Self::Wait),
            "block" => Ok(Self::Block),
            _ => Err(ApiError::UnknownHotThreadsType(s.to_string())),
        }
    }
}

/// Parametry pro `GET /_nodes/{node}/hot_threads`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotThreadsRequest {
    /// `None` = všechny nody
    pub node: Option<String>,
    pub kind: HotThreadsType,
    pub threads: u32,
    pub interval: String,
    pub ignore_idle_threads: bool,
}

impl Default for HotThreadsRequest {
    fn default() -> Self {
        Self {
            node: None,
            kind: HotThreadsType::Cpu,
            threads: 3,
            interval: "500ms".to_string(),
            ignore_idle_threads: true,
        }
    }
}

impl HotThreadsRequest {
    pub fn path(&self) -> String {
        format!(
            "/_nodes/{}/hot_threads?type={}&threads={}&interval={}&ignore_idle_threads={}",
            self.node.as_deref().unwrap_or("_all"),
            self.kind.as_str(),
            self.threads,
            self.interval,
            self.ignore_idle_threads
        )
    }
}

impl EsClient {
    /// Získá cluster health
    pub async fn cluster_health(&self) -> Result<ClusterHealth> {
        self.get("/_cluster/health").await
    }

    /// Získá cluster state (nody, routing, stav indexů)
    pub async fn cluster_state(&self) -> Result<ClusterState> {
        self.get(CLUSTER_STATE_PATH).await
    }

    pub async fn nodes_stats(&self) -> Result<NodesStats> {
        self.get("/_nodes/stats/jvm,fs,os,process").await
    }

    pub async fn nodes_info(&self) -> Result<NodesInfo> {
        self.get("/_nodes/_all/os,jvm").await
    }

    pub async fn indices_stats(&self) -> Result<IndicesStats> {
        self.get("/_stats/docs,store").await
    }

    pub async fn aliases(&self) -> Result<Aliases> {
        self.get("/_aliases").await
    }

    /// Všechny odpovědi pro jeden snapshot, stahují se souběžně
    pub async fn fetch_cluster(&self) -> Result<ClusterPayloads> {
        let (health, state, nodes_stats, nodes_info, indices_stats, aliases) = tokio::try_join!(
            self.cluster_health(),
            self.cluster_state(),
            self.nodes_stats(),
            self.nodes_info(),
            self.indices_stats(),
            self.aliases(),
        )?;

        Ok(ClusterPayloads {
            health,
            state,
            nodes_stats,
            nodes_info,
            indices_stats,
            aliases,
        })
    }

    /// Spustí cat API a vrátí textovou tabulku
    pub async fn cat(&self, api: CatApi) -> Result<String> {
        self.get_raw(&format!("/_cat/{}?v", api.as_str())).await
    }

    pub async fn hot_threads(&self, request: &HotThreadsRequest) -> Result<String> {
        self.get_raw(&request.path()).await
    }

    /// Aktualizuje persistent / transient cluster settings
    pub async fn update_cluster_settings(&self, settings: &Value) -> Result<Value> {
        self.put("/_cluster/settings", settings).await
    }
}

impl ClusterSource for EsClient {
    async fn fetch(&self) -> Result<ClusterPayloads> {
        self.fetch_cluster().await
    }
}
