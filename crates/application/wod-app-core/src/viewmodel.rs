use wod_core::resolve::resolve;
use wod_core::step_map::build;
use wod_core::{CatalogError, Category, CategoryFilter, Event, EventIdentity, RenderableMap};

use crate::domain::BoardState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WodCardVm {
    pub identity: EventIdentity,
    pub id: String,
    pub category: Category,
    pub title: String,
    pub time_cap: String,
    /// Empty for variant-less events.
    pub variant_keys: Vec<String>,
    pub selected_variant: Option<String>,
    pub movements: Vec<String>,
    pub load: Option<String>,
    pub notes: Option<String>,
    pub flow: Option<String>,
    pub map: RenderableMap,
    pub details_open: bool,
}

impl WodCardVm {
    pub fn build(
        event: &Event,
        selected_variant: Option<&str>,
        details_open: bool,
    ) -> Result<Self, CatalogError> {
        let fields = resolve(event, selected_variant.unwrap_or_default())?;
        Ok(Self {
            identity: event.identity(),
            id: event.id.clone(),
            category: event.category,
            title: event.title.clone(),
            time_cap: event.time_cap.clone(),
            variant_keys: event
                .variants()
                .map(|set| set.keys().map(str::to_string).collect())
                .unwrap_or_default(),
            selected_variant: fields.variant.map(str::to_string),
            movements: fields.movements.to_vec(),
            load: fields.load.map(str::to_string),
            notes: fields.notes.map(str::to_string),
            flow: fields.flow.map(str::to_string),
            map: build(fields.visual_map),
            details_open,
        })
    }

    pub fn has_variants(&self) -> bool {
        !self.variant_keys.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardVm {
    pub category: CategoryFilter,
    pub query: String,
    pub cards: Vec<WodCardVm>,
    /// Set when nothing matched.
    pub empty_message: Option<String>,
}

pub fn empty_result_message(query: &str) -> String {
    format!("Aucun WOD trouvé pour \"{query}\"")
}

impl BoardVm {
    pub fn build<'a>(
        state: &BoardState,
        visible: impl IntoIterator<Item = &'a Event>,
    ) -> Result<Self, CatalogError> {
        let cards = visible
            .into_iter()
            .map(|event| {
                WodCardVm::build(
                    event,
                    state.selected_variant(event),
                    state.is_expanded(&event.identity()),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let empty_message = cards
            .is_empty()
            .then(|| empty_result_message(&state.query));
        Ok(Self {
            category: state.category,
            query: state.query.clone(),
            cards,
            empty_message,
        })
    }
}
