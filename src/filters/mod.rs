pub mod alias_filter;
pub mod index_filter;
pub mod node_filter;
pub mod pattern;

use std::cmp::Ordering;

pub use alias_filter::AliasFilter;
pub use index_filter::{IndexFilter, IndexSortField};
pub use node_filter::{NodeFilter, NodeSortField};
pub use pattern::NamePattern;

/// Porovnávací funkce pro řazení kolekce
pub type Comparator<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;

/// Filtr nad entitami clusteru, kterým se řídí [`crate::models::Paginator`]
pub trait EntityFilter<T> {
    fn matches(&self, item: &T) -> bool;

    /// Filtr nic nevyřazuje, paginator pak filtrování přeskočí
    fn is_blank(&self) -> bool;

    fn sorting(&self) -> Option<Comparator<'_, T>> {
        None
    }
}

/// Otočí pořadí, pokud se neřadí vzestupně
pub(crate) fn directed(ordering: Ordering, asc: bool) -> Ordering {
    if asc {
        ordering
    } else {
        ordering.reverse()
    }
}
