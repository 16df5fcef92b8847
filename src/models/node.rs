use serde::Serialize;
use std::hash::{Hash, Hasher};

use crate::es::payloads::{NodeInfo, NodeStats};
use crate::utils::format_bytes;

const DATA_ROLES: &[&str] = &["data", "data_content", "data_hot", "data_warm", "data_cold"];

/// Node clusteru složený z node info a node stats
///
/// Rovnost i hash jsou jen podle `id`, takže node ze dvou různých snapshotů
/// se porovná správně i když se mu mezitím změnily statistiky.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub elastic_version: String,
    pub transport_address: String,
    pub host: String,
    pub jvm_version: String,
    pub available_processors: u32,
    pub roles: Vec<String>,
    pub master: bool,
    pub data: bool,
    pub client: bool,
    current_master: bool,

    // Heap
    pub heap_used: String,
    pub heap_used_in_bytes: u64,
    pub heap_committed: String,
    pub heap_committed_in_bytes: u64,
    pub heap_max: String,
    pub heap_max_in_bytes: u64,
    pub heap_used_percent: u64,

    // Disk
    pub disk_total: String,
    pub disk_total_in_bytes: u64,
    pub disk_free: String,
    pub disk_free_in_bytes: u64,
    pub disk_used_percent: u64,

    pub cpu: i64,
    pub load_average: f64,
    /// Uptime JVM v milisekundách
    pub uptime: u64,
}

impl Node {
    /// Chybějící stats nebo info nejsou chyba, pole zůstanou nulová/prázdná
    pub fn new(id: &str, stats: Option<&NodeStats>, info: Option<&NodeInfo>) -> Self {
        let default_stats = NodeStats::default();
        let default_info = NodeInfo::default();
        let stats = stats.unwrap_or(&default_stats);
        let info = info.unwrap_or(&default_info);

        let master = info.roles.iter().any(|r| r == "master");
        let data = info.roles.iter().any(|r| DATA_ROLES.contains(&r.as_str()));

        let mem = &stats.jvm.mem;
        let fs = &stats.fs.total;

        Self {
            id: id.to_string(),
            name: info.name.clone(),
            elastic_version: info.version.clone(),
            transport_address: info.transport_address.clone(),
            host: info.host.clone(),
            jvm_version: info.jvm.version.clone(),
            available_processors: info.os.available_processors,
            roles: info.roles.clone(),
            master,
            data,
            client: !master && !data,
            current_master: false,

            heap_used: format_bytes(mem.heap_used_in_bytes),
            heap_used_in_bytes: mem.heap_used_in_bytes,
            heap_committed: format_bytes(mem.heap_committed_in_bytes),
            heap_committed_in_bytes: mem.heap_committed_in_bytes,
            heap_max: format_bytes(mem.heap_max_in_bytes),
            heap_max_in_bytes: mem.heap_max_in_bytes,
            heap_used_percent: mem.heap_used_percent,

            disk_total: format_bytes(fs.total_in_bytes),
            disk_total_in_bytes: fs.total_in_bytes,
            disk_free: format_bytes(fs.free_in_bytes),
            disk_free_in_bytes: fs.free_in_bytes,
            disk_used_percent: disk_used_percent(fs.total_in_bytes, fs.free_in_bytes),

            cpu: stats.process.cpu.percent,
            load_average: stats
                .os
                .cpu
                .load_average
                .as_ref()
                .and_then(|load| load.one_minute)
                .unwrap_or(0.0),
            uptime: stats.jvm.uptime_in_millis,
        }
    }

    /// Označí node jako aktuálního mastera (volá jen Cluster při sestavení)
    pub fn set_current_master(&mut self) {
        self.current_master = true;
    }

    pub fn is_current_master(&self) -> bool {
        self.current_master
    }
}

/// round((total - free) / total * 100), pro prázdný disk 0
fn disk_used_percent(total: u64, free: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let used = total.saturating_sub(free);
    ((used as f64 / total as f64) * 100.0).round() as u64
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn node_info(roles: Value) -> NodeInfo {
        serde_json::from_value(json!({
            "name": "test-node",
            "version": "2.11.1",
            "transport_address": "127.0.0.1:9300",
            "host": "127.0.0.1",
            "roles": roles,
            "jvm": { "version": "17.0.2" },
            "os": { "available_processors": 8 }
        }))
        .unwrap()
    }

    fn node_stats() -> NodeStats {
        serde_json::from_value(json!({
            "jvm": {
                "uptime_in_millis": 86400000,
                "mem": {
                    "heap_used_in_bytes": 1073741824u64,
                    "heap_committed_in_bytes": 2147483648u64,
                    "heap_used_percent": 50,
                    "heap_max_in_bytes": 4294967296u64
                }
            },
            "fs": { "total": { "total_in_bytes": 500000000000u64, "free_in_bytes": 250000000000u64 } },
            "process": { "cpu": { "percent": 25 } },
            "os": { "cpu": { "load_average": { "1m": 1.5 } } }
        }))
        .unwrap()
    }

    fn node_with_roles(roles: Value) -> Node {
        Node::new("node1", Some(&node_stats()), Some(&node_info(roles)))
    }

    #[test]
    fn test_basic_info() {
        let node = node_with_roles(json!(["master", "data", "ingest"]));

        assert_eq!(node.id, "node1");
        assert_eq!(node.name, "test-node");
        assert_eq!(node.elastic_version, "2.11.1");
        assert_eq!(node.jvm_version, "17.0.2");
        assert_eq!(node.available_processors, 8);
        assert_eq!(node.transport_address, "127.0.0.1:9300");
        assert_eq!(node.host, "127.0.0.1");
        assert!(!node.is_current_master());
    }

    #[test]
    fn test_roles() {
        let master = node_with_roles(json!(["master"]));
        assert!(master.master && !master.data && !master.client);

        let data = node_with_roles(json!(["data"]));
        assert!(!data.master && data.data && !data.client);

        for role in ["data_content", "data_hot", "data_warm", "data_cold"] {
            assert!(node_with_roles(json!([role])).data, "role {} is a data role", role);
        }

        let ingest = node_with_roles(json!(["ingest"]));
        assert!(ingest.client);

        let empty = node_with_roles(json!([]));
        assert!(!empty.master && !empty.data && empty.client);

        let both = node_with_roles(json!(["master", "data"]));
        assert!(both.master && both.data && !both.client);
    }

    #[test]
    fn test_heap_and_disk() {
        let node = node_with_roles(json!(["data"]));

        assert_eq!(node.heap_used, "1.00 GB");
        assert_eq!(node.heap_committed, "2.00 GB");
        assert_eq!(node.heap_max, "4.00 GB");
        assert_eq!(node.heap_used_in_bytes, 1073741824);
        assert_eq!(node.heap_used_percent, 50);

        assert_eq!(node.disk_total_in_bytes, 500000000000);
        assert_eq!(node.disk_free_in_bytes, 250000000000);
        assert_eq!(node.disk_used_percent, 50);
    }

    #[test]
    fn test_cpu_load_uptime() {
        let node = node_with_roles(json!(["data"]));

        assert_eq!(node.cpu, 25);
        assert_eq!(node.load_average, 1.5);
        assert_eq!(node.uptime, 86400000);
    }

    #[test]
    fn test_missing_load_average() {
        let mut stats = node_stats();
        stats.os.cpu.load_average = None;

        let node = Node::new("node1", Some(&stats), Some(&node_info(json!([]))));
        assert_eq!(node.load_average, 0.0);
    }

    #[test]
    fn test_missing_stats_and_info() {
        let node = Node::new("lonely", None, None);

        assert_eq!(node.name, "");
        assert_eq!(node.heap_used_in_bytes, 0);
        assert_eq!(node.heap_used, "0 B");
        assert_eq!(node.disk_used_percent, 0);
        assert!(node.client);
    }

    #[test]
    fn test_disk_used_percent_rounding() {
        assert_eq!(disk_used_percent(3, 2), 33);
        assert_eq!(disk_used_percent(3, 1), 67);
        assert_eq!(disk_used_percent(0, 0), 0);
        assert_eq!(disk_used_percent(10, 20), 0);
    }

    #[test]
    fn test_set_current_master() {
        let mut node = node_with_roles(json!(["master"]));
        node.set_current_master();
        assert!(node.is_current_master());
    }

    #[test]
    fn test_equality_by_id() {
        let a = Node::new("node1", Some(&node_stats()), Some(&node_info(json!(["master"]))));
        let b = Node::new("node1", None, None);
        let c = Node::new("node2", Some(&node_stats()), Some(&node_info(json!(["master"]))));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(Some(&a) != None);
    }
}
