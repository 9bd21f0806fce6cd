use wod_core::Event;

use crate::StorageError;

pub fn encode_event(event: &Event) -> Result<Vec<u8>, StorageError> {
    Ok(serde_json::to_vec(event)?)
}

pub fn decode_event(bytes: &[u8]) -> Result<Event, StorageError> {
    Ok(serde_json::from_slice(bytes)?)
}
