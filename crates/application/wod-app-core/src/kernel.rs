use wod_core::{CatalogError, Event, EventIdentity, EventPatch};

use crate::app_core::{reduce, BoardCommand, BoardEvent};
use crate::catalog_store::CatalogStore;
use crate::domain::BoardState;
use crate::filter_cache::FilterCache;
use crate::mirror::MirrorOutcome;
use crate::viewmodel::BoardVm;

/// Owns the catalog and the board state; the single entry point of an
/// interactive front end.
#[derive(Debug)]
pub struct WodBoard {
    pub store: CatalogStore,
    state: BoardState,
    cache: FilterCache,
}

impl WodBoard {
    pub fn new(store: CatalogStore) -> Self {
        let state = BoardState::for_catalog(store.events());
        Self {
            store,
            state,
            cache: FilterCache::new(),
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    fn apply(&mut self, ev: BoardEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, ev);
    }

    /// Validate `cmd` against the catalog and apply it. Rejected commands
    /// leave both the catalog and the board untouched.
    pub fn dispatch(&mut self, cmd: BoardCommand) -> Result<(), CatalogError> {
        match cmd {
            BoardCommand::SelectCategory(category) => {
                self.apply(BoardEvent::CategoryChanged(category))
            }
            BoardCommand::SetQuery(query) => self.apply(BoardEvent::QueryChanged(query)),
            BoardCommand::ClearQuery => self.apply(BoardEvent::QueryChanged(String::new())),

            BoardCommand::SelectVariant { identity, key } => {
                let event = self
                    .store
                    .get(&identity)
                    .ok_or_else(|| CatalogError::NotFound(identity.clone()))?;
                // Variant-less events have nothing to select.
                let valid = event.variants().is_some_and(|set| set.contains(&key));
                if !valid {
                    return Err(CatalogError::UnresolvedVariant { identity, key });
                }
                self.apply(BoardEvent::VariantSelected { identity, key });
            }

            BoardCommand::ToggleDetails(identity) => {
                if self.store.get(&identity).is_none() {
                    return Err(CatalogError::NotFound(identity));
                }
                self.apply(BoardEvent::DetailsToggled(identity));
            }

            BoardCommand::Edit { identity, patch } => {
                self.edit(&identity, &patch)?;
            }
        }
        Ok(())
    }

    pub fn edit(
        &mut self,
        identity: &EventIdentity,
        patch: &EventPatch,
    ) -> Result<Event, CatalogError> {
        self.store.apply_update(identity, patch)
    }

    /// Pull the remote catalog (when enabled) and re-sync variant selections.
    pub async fn hydrate(&mut self) -> usize {
        let changed = self.store.hydrate_from_remote().await;
        if changed > 0 {
            self.apply(BoardEvent::CatalogChanged(self.store.events().to_vec()));
        }
        changed
    }

    /// Drain finished background writes. Call once per interaction turn.
    pub fn tick(&mut self) -> Vec<MirrorOutcome> {
        self.store.drain_outcomes()
    }

    pub fn view(&mut self) -> Result<BoardVm, CatalogError> {
        let query = self.state.search_query();
        let visible = self.cache.events(&self.store, self.state.category, &query);
        BoardVm::build(&self.state, visible)
    }

    pub fn cache_stats(&self) -> (u64, u64) {
        self.cache.stats()
    }
}
