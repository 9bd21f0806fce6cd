use std::collections::{HashMap, HashSet};

use wod_core::{CategoryFilter, Event, EventIdentity, SearchQuery};

/// Interactive board state: everything the user toggles, nothing rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pub category: CategoryFilter,
    /// Raw query as typed; normalized through [`SearchQuery`].
    pub query: String,
    pub selected_variants: HashMap<EventIdentity, String>,
    pub expanded: HashSet<EventIdentity>,
}

impl BoardState {
    /// Initial state: all categories, empty query, each event on its first
    /// variant, every details panel closed.
    pub fn for_catalog(events: &[Event]) -> Self {
        let mut state = Self::default();
        state.reconcile(events);
        state
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new(&self.query)
    }

    /// Selected variant of `event`, falling back to its default key.
    pub fn selected_variant<'a>(&'a self, event: &'a Event) -> Option<&'a str> {
        let variants = event.variants()?;
        match self.selected_variants.get(&event.identity()) {
            Some(key) if variants.contains(key) => Some(key.as_str()),
            _ => Some(variants.default_key()),
        }
    }

    pub fn is_expanded(&self, identity: &EventIdentity) -> bool {
        self.expanded.contains(identity)
    }

    /// Drop selections that no longer name a variant and default the rest.
    pub fn reconcile(&mut self, events: &[Event]) {
        for event in events {
            let identity = event.identity();
            match event.variants() {
                None => {
                    self.selected_variants.remove(&identity);
                }
                Some(variants) => {
                    let valid = self
                        .selected_variants
                        .get(&identity)
                        .is_some_and(|key| variants.contains(key));
                    if !valid {
                        self.selected_variants
                            .insert(identity, variants.default_key().to_string());
                    }
                }
            }
        }
    }
}
