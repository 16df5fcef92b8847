use crate::filters::EntityFilter;

/// Jedna stránka výsledků
///
/// `elements` má vždy přesně `page_size` prvků, prázdná místa za koncem
/// výsledků jsou `None`. `first` a `last` jsou 1-based pozice ve
/// vyfiltrovaných výsledcích (0 pokud nic neprošlo).
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub elements: Vec<Option<&'a T>>,
    pub total: usize,
    pub first: usize,
    pub last: usize,
    pub next: bool,
    pub previous: bool,
}

impl<'a, T> Page<'a, T> {
    /// Jen skutečné prvky, bez výplně
    pub fn items(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.elements.iter().flatten().copied()
    }
}

/// Stránkování nad kolekcí, kterou řadí a filtruje `F`
#[derive(Debug, Clone)]
pub struct Paginator<T, F> {
    page: usize,
    page_size: usize,
    collection: Vec<T>,
    filter: F,
}

impl<T, F: EntityFilter<T>> Paginator<T, F> {
    pub fn new(page: usize, page_size: usize, collection: Vec<T>, filter: F) -> Self {
        let mut paginator = Self {
            page,
            page_size: page_size.max(1),
            collection: Vec::new(),
            filter,
        };
        paginator.set_collection(collection);
        paginator
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Nulová velikost stránky se bere jako 1. Aktuální stránka se nemění.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Pod stránku 1 to nehlídá, opraví se až při výpočtu stránky
    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn collection(&self) -> &[T] {
        &self.collection
    }

    /// Nahradí kolekci a hned ji seřadí podle filtru
    pub fn set_collection(&mut self, collection: Vec<T>) {
        self.collection = collection;
        self.sort();
    }

    /// Přeřadí kolekci, např. po změně řazení ve filtru
    pub fn sort(&mut self) {
        if let Some(cmp) = self.filter.sorting() {
            self.collection.sort_by(|a, b| cmp(a, b));
        }
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Po změně řazení je potřeba zavolat [`Paginator::sort`]
    pub fn filter_mut(&mut self) -> &mut F {
        &mut self.filter
    }

    pub fn set_filter(&mut self, filter: F) {
        self.filter = filter;
        self.sort();
    }

    /// Prvky, které projdou filtrem, v pořadí kolekce
    pub fn results(&self) -> Vec<&T> {
        if self.filter.is_blank() {
            self.collection.iter().collect()
        } else {
            self.collection.iter().filter(|item| self.filter.matches(item)).collect()
        }
    }

    /// Stránka, kterou by vrátil [`Paginator::get_page`], bez úpravy čísla stránky
    pub fn page(&self) -> Page<'_, T> {
        let results = self.results();
        let page = self.effective_page(results.len());
        self.build_page(&results, page)
    }

    /// Stránka za koncem výsledků (nebo stránka 0) se vrátí na stránku 1
    pub fn get_page(&mut self) -> Page<'_, T> {
        let total = self.results().len();
        self.page = self.effective_page(total);
        self.page()
    }

    fn effective_page(&self, total: usize) -> usize {
        if self.page == 0 || (self.page - 1).saturating_mul(self.page_size) >= total {
            1
        } else {
            self.page
        }
    }

    fn build_page<'a>(&self, results: &[&'a T], page: usize) -> Page<'a, T> {
        let total = results.len();
        let start = ((page - 1) * self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);

        let mut elements: Vec<Option<&'a T>> = results[start..end].iter().map(|item| Some(*item)).collect();
        elements.resize(self.page_size, None);

        Page {
            elements,
            total,
            first: if total > 0 { start + 1 } else { 0 },
            last: end,
            next: end < total,
            previous: page > 1,
        }
    }
}
