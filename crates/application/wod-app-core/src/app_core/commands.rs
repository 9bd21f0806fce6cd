use wod_core::{CategoryFilter, EventIdentity, EventPatch};

#[derive(Debug, Clone)]
pub enum BoardCommand {
    // Filtering
    SelectCategory(CategoryFilter),
    SetQuery(String),
    ClearQuery,

    // Cards
    SelectVariant { identity: EventIdentity, key: String },
    ToggleDetails(EventIdentity),

    // Admin
    Edit {
        identity: EventIdentity,
        patch: EventPatch,
    },
}
