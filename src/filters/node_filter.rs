use clap::ValueEnum;

use super::{directed, Comparator, EntityFilter, NamePattern};
use crate::models::Node;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum NodeSortField {
    #[default]
    Name,
    Cpu,
    HeapUsedPercent,
    DiskUsedPercent,
    LoadAverage,
    Uptime,
}

/// Filtr nodů podle názvu a role
///
/// Node projde, pokud má aspoň jednu z povolených rolí (data / master / client).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFilter {
    name: NamePattern,
    pub data: bool,
    pub master: bool,
    pub client: bool,
    pub timestamp: i64,
    pub sort: NodeSortField,
    pub asc: bool,
}

impl NodeFilter {
    pub fn new(name: &str, data: bool, master: bool, client: bool, timestamp: i64) -> Self {
        Self {
            name: NamePattern::new(name),
            data,
            master,
            client,
            timestamp,
            sort: NodeSortField::Name,
            asc: true,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = NamePattern::new(name);
    }

    fn matches_type(&self, node: &Node) -> bool {
        (self.data && node.data) || (self.master && node.master) || (self.client && node.client)
    }
}

impl Default for NodeFilter {
    fn default() -> Self {
        Self::new("", true, true, true, 0)
    }
}

impl EntityFilter<Node> for NodeFilter {
    fn matches(&self, node: &Node) -> bool {
        if self.is_blank() {
            return true;
        }
        self.matches_type(node) && self.name.matches(&node.name)
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty() && self.data && self.master && self.client
    }

    fn sorting(&self) -> Option<Comparator<'_, Node>> {
        let (sort, asc) = (self.sort, self.asc);
        Some(Box::new(move |a: &Node, b: &Node| {
            let ordering = match sort {
                NodeSortField::Name => a.name.cmp(&b.name),
                NodeSortField::Cpu => a.cpu.cmp(&b.cpu),
                NodeSortField::HeapUsedPercent => a.heap_used_percent.cmp(&b.heap_used_percent),
                NodeSortField::DiskUsedPercent => a.disk_used_percent.cmp(&b.disk_used_percent),
                NodeSortField::LoadAverage => a.load_average.total_cmp(&b.load_average),
                NodeSortField::Uptime => a.uptime.cmp(&b.uptime),
            };
            directed(ordering.then_with(|| a.name.cmp(&b.name)), asc)
        }))
    }
}
