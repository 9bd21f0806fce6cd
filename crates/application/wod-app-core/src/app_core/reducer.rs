use crate::domain::BoardState;

use super::events::BoardEvent;

pub fn reduce(mut state: BoardState, ev: BoardEvent) -> BoardState {
    match ev {
        BoardEvent::CategoryChanged(category) => state.category = category,

        BoardEvent::QueryChanged(query) => state.query = query,

        BoardEvent::VariantSelected { identity, key } => {
            state.selected_variants.insert(identity, key);
        }

        BoardEvent::DetailsToggled(identity) => {
            if !state.expanded.remove(&identity) {
                state.expanded.insert(identity);
            }
        }

        BoardEvent::CatalogChanged(events) => state.reconcile(&events),
    }
    state
}
