//! Built-in competition board.

use crate::validate::validate_catalog;
use crate::{Event, ModelError};

const SEED_JSON: &str = include_str!("../data/seed.json");

/// Parse and check the embedded catalog (6 individual, 6 team events).
pub fn catalog() -> Result<Vec<Event>, ModelError> {
    let events: Vec<Event> = serde_json::from_str(SEED_JSON)?;
    validate_catalog(&events)?;
    Ok(events)
}
