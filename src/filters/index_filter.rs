use clap::ValueEnum;

use super::{directed, Comparator, EntityFilter, NamePattern};
use crate::models::Index;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum IndexSortField {
    #[default]
    Name,
    Docs,
    Size,
    Shards,
}

/// Filtr indexů
///
/// `closed`, `special` a `healthy` jsou povolující přepínače: `true` znamená
/// "zobrazit i tyto". `healthy = false` zobrazí jen nezdravé indexy.
/// `timestamp` slouží jen k detekci změny filtru.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexFilter {
    name: NamePattern,
    pub closed: bool,
    pub special: bool,
    pub healthy: bool,
    pub asc: bool,
    pub timestamp: i64,
    pub sort: IndexSortField,
}

impl IndexFilter {
    pub fn new(name: &str, closed: bool, special: bool, healthy: bool, asc: bool, timestamp: i64) -> Self {
        Self {
            name: NamePattern::new(name),
            closed,
            special,
            healthy,
            asc,
            timestamp,
            sort: IndexSortField::Name,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = NamePattern::new(name);
    }

    fn matches_name(&self, index: &Index) -> bool {
        self.name.matches(&index.name) || self.name.matches_any(index.aliases.iter().map(String::as_str))
    }
}

impl Default for IndexFilter {
    fn default() -> Self {
        Self::new("", true, true, true, true, 0)
    }
}

impl EntityFilter<Index> for IndexFilter {
    fn matches(&self, index: &Index) -> bool {
        if self.is_blank() {
            return true;
        }
        if !self.special && index.special {
            return false;
        }
        if !self.closed && index.is_closed() {
            return false;
        }
        if !self.healthy && !index.unhealthy {
            return false;
        }
        self.matches_name(index)
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty() && self.closed && self.special && self.healthy
    }

    fn sorting(&self) -> Option<Comparator<'_, Index>> {
        let (sort, asc) = (self.sort, self.asc);
        Some(Box::new(move |a: &Index, b: &Index| {
            let ordering = match sort {
                IndexSortField::Name => a.name.cmp(&b.name),
                IndexSortField::Docs => a.num_docs.cmp(&b.num_docs),
                IndexSortField::Size => a.total_size_in_bytes.cmp(&b.total_size_in_bytes),
                IndexSortField::Shards => a.num_of_shards.cmp(&b.num_of_shards),
            };
            directed(ordering.then_with(|| a.name.cmp(&b.name)), asc)
        }))
    }
}
