use std::collections::HashSet;

use crate::{Event, ModelError};

/// Catalog-wide checks that single records cannot enforce on their own.
///
/// Body shape and non-empty movements are already guaranteed by [`Event`]'s
/// constructors; this only rejects repeated identities.
pub fn validate_catalog(events: &[Event]) -> Result<(), ModelError> {
    let mut seen = HashSet::with_capacity(events.len());
    for event in events {
        let identity = event.identity();
        if !seen.insert(identity.clone()) {
            return Err(ModelError::DuplicateIdentity(identity));
        }
    }
    Ok(())
}
