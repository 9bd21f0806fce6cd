use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CatalogError, Event};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_TIME_CAP: &str = "timeCap";
pub const FIELD_FLOW: &str = "flow";

/// Top-level keys the edit surface may touch.
pub const EDITABLE_FIELDS: [&str; 3] = [FIELD_TITLE, FIELD_TIME_CAP, FIELD_FLOW];

/// Partial update of an event's editable text fields. Absent fields are left
/// untouched when the patch is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
}

impl EventPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_time_cap(mut self, time_cap: impl Into<String>) -> Self {
        self.time_cap = Some(time_cap.into());
        self
    }

    pub fn with_flow(mut self, flow: impl Into<String>) -> Self {
        self.flow = Some(flow.into());
        self
    }

    /// Build a patch from a loose field map as sent by an editor.
    ///
    /// Keys outside [`EDITABLE_FIELDS`] are rejected, as are non-string
    /// values. Nothing is applied when any key is rejected.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, CatalogError> {
        let mut patch = Self::default();
        for (key, value) in fields {
            let slot = match key.as_str() {
                FIELD_TITLE => &mut patch.title,
                FIELD_TIME_CAP => &mut patch.time_cap,
                FIELD_FLOW => &mut patch.flow,
                other => return Err(CatalogError::UnsupportedField(other.to_string())),
            };
            let Value::String(text) = value else {
                return Err(CatalogError::InvalidField(key.clone()));
            };
            *slot = Some(text.clone());
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.time_cap.is_none() && self.flow.is_none()
    }

    /// Names of the fields this patch replaces, in wire spelling.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.title.is_some() {
            names.push(FIELD_TITLE);
        }
        if self.time_cap.is_some() {
            names.push(FIELD_TIME_CAP);
        }
        if self.flow.is_some() {
            names.push(FIELD_FLOW);
        }
        names
    }

    /// Shallow merge over `event`; identity, body and maps are carried over.
    pub fn apply_to(&self, event: &Event) -> Event {
        let mut next = event.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(time_cap) = &self.time_cap {
            next.time_cap = time_cap.clone();
        }
        if let Some(flow) = &self.flow {
            next.flow = Some(flow.clone());
        }
        next
    }
}
