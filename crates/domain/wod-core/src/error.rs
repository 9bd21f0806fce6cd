use crate::EventIdentity;

/// Shape violations in event records, caught when a catalog is loaded.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("event {0} has both defaultData and variants")]
    AmbiguousBody(EventIdentity),
    #[error("event {0} has neither defaultData nor variants")]
    MissingBody(EventIdentity),
    #[error("variants must not be empty")]
    EmptyVariants,
    #[error("event {identity} has an empty movement list{}", variant_suffix(.variant))]
    EmptyMovements {
        identity: EventIdentity,
        variant: Option<String>,
    },
    #[error("identity {0} appears more than once in the catalog")]
    DuplicateIdentity(EventIdentity),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

fn variant_suffix(variant: &Option<String>) -> String {
    match variant {
        Some(name) => format!(" (variant '{name}')"),
        None => String::new(),
    }
}

/// Failures of catalog operations (lookup, resolution, editing).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("event {0} not found")]
    NotFound(EventIdentity),
    #[error("variant '{key}' is not defined for event {identity}")]
    UnresolvedVariant { identity: EventIdentity, key: String },
    #[error(
        "field '{0}' cannot be edited (editable: {editable})",
        editable = crate::patch::EDITABLE_FIELDS.join(", ")
    )]
    UnsupportedField(String),
    #[error("field '{0}' must be a string")]
    InvalidField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorKind {
    NotFound,
    UnresolvedVariant,
    RejectedEdit,
}

impl CatalogError {
    pub fn kind(&self) -> CatalogErrorKind {
        match self {
            CatalogError::NotFound(_) => CatalogErrorKind::NotFound,
            CatalogError::UnresolvedVariant { .. } => CatalogErrorKind::UnresolvedVariant,
            CatalogError::UnsupportedField(_) | CatalogError::InvalidField(_) => {
                CatalogErrorKind::RejectedEdit
            }
        }
    }
}
