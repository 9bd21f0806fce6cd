use wod_core::{CategoryFilter, Event, EventIdentity};

#[derive(Debug, Clone)]
pub enum BoardEvent {
    CategoryChanged(CategoryFilter),
    QueryChanged(String),
    VariantSelected { identity: EventIdentity, key: String },
    DetailsToggled(EventIdentity),
    /// The event list changed underneath the board (edit or hydration).
    CatalogChanged(Vec<Event>),
}
