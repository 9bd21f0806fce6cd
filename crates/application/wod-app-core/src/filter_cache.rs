use wod_core::search::filter_positions;
use wod_core::{CategoryFilter, Event, SearchQuery};

use crate::CatalogStore;

type CacheKey = (CategoryFilter, SearchQuery, u64);

/// Memo of the last filter result, keyed by category, normalized query and
/// catalog epoch. A store mutation bumps the epoch, so a hit is never stale.
#[derive(Debug, Default)]
pub struct FilterCache {
    key: Option<CacheKey>,
    positions: Vec<usize>,
    hits: u64,
    misses: u64,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(
        &mut self,
        store: &CatalogStore,
        category: CategoryFilter,
        query: &SearchQuery,
    ) -> &[usize] {
        let key = (category, query.clone(), store.epoch());
        if self.key.as_ref() == Some(&key) {
            self.hits += 1;
        } else {
            self.positions = filter_positions(store.events(), category, query);
            self.key = Some(key);
            self.misses += 1;
        }
        &self.positions
    }

    pub fn events<'a>(
        &mut self,
        store: &'a CatalogStore,
        category: CategoryFilter,
        query: &SearchQuery,
    ) -> Vec<&'a Event> {
        let events = store.events();
        self.positions(store, category, query)
            .iter()
            .map(|&ix| &events[ix])
            .collect()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
