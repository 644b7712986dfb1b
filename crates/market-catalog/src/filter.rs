//! Search and facet filtering over the catalog

use crate::catalog::Catalog;
use crate::record::{TemplateRecord, TemplateType};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Inputs to the filter engine. `None` means no restriction on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterQuery {
    pub search: String,
    pub kind: Option<TemplateType>,
    pub category: Option<String>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_kind(mut self, kind: TemplateType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// True when no field restricts the result
    pub fn is_unrestricted(&self) -> bool {
        self.search.is_empty() && self.kind.is_none() && self.category.is_none()
    }

    /// Case-insensitive substring match against title, description, or any tag
    pub fn matches_search(&self, record: &TemplateRecord) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        record.title.to_lowercase().contains(&needle)
            || record.description.to_lowercase().contains(&needle)
            || record
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }

    pub fn matches_kind(&self, record: &TemplateRecord) -> bool {
        self.kind.is_none_or(|kind| record.kind == kind)
    }

    pub fn matches_category(&self, record: &TemplateRecord) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| record.category == category)
    }

    /// All three predicates hold
    pub fn matches(&self, record: &TemplateRecord) -> bool {
        self.matches_search(record) && self.matches_kind(record) && self.matches_category(record)
    }

    /// Stable filter: keeps matching items in their input order
    pub fn apply<'a, I, R>(&self, records: I) -> Vec<&'a R>
    where
        I: IntoIterator<Item = &'a R>,
        R: AsRef<TemplateRecord> + 'a,
    {
        records
            .into_iter()
            .filter(|r| self.matches(AsRef::<TemplateRecord>::as_ref(*r)))
            .collect()
    }

    /// Catalog positions of the matching records, in catalog order
    pub fn positions(&self, catalog: &Catalog) -> Vec<usize> {
        catalog
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| i)
            .collect()
    }
}

impl AsRef<TemplateRecord> for TemplateRecord {
    fn as_ref(&self) -> &TemplateRecord {
        self
    }
}

/// Filter the catalog, returning shared handles to the visible records
pub fn filter(catalog: &Catalog, query: &FilterQuery) -> Vec<Arc<TemplateRecord>> {
    catalog
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect()
}

/// Memoizes filter results keyed by the full query tuple.
///
/// The catalog never changes for the lifetime of a cache, so a result for a
/// given query stays valid. Entries hold catalog positions, not records.
pub struct FilterCache {
    entries: LruCache<FilterQuery, Arc<[usize]>>,
    hits: u64,
    misses: u64,
}

impl FilterCache {
    pub const DEFAULT_CAPACITY: usize = 32;

    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Positions of matching records, computed at most once per distinct query
    pub fn positions(&mut self, catalog: &Catalog, query: &FilterQuery) -> Arc<[usize]> {
        if let Some(cached) = self.entries.get(query) {
            self.hits += 1;
            return Arc::clone(cached);
        }

        self.misses += 1;
        let positions: Arc<[usize]> = query.positions(catalog).into();
        log::trace!(
            "filter {:?} -> {} of {} records",
            query,
            positions.len(),
            catalog.len()
        );
        self.entries.put(query.clone(), Arc::clone(&positions));
        positions
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for FilterCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
