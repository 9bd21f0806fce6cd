use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod icons;
pub mod patch;
pub mod resolve;
pub mod search;
pub mod seed;
pub mod step_map;
pub mod validate;

pub use error::{CatalogError, ModelError};
pub use icons::Icon;
pub use patch::EventPatch;
pub use resolve::{resolve, resolve_default, EffectiveFields};
pub use search::{filter, CategoryFilter, SearchQuery};
pub use step_map::{MapNode, RenderableMap, StepPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "INDIV")]
    Indiv,
    #[serde(rename = "TEAM")]
    Team,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Indiv => "INDIV",
            Category::Team => "TEAM",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable lookup key of an event: the event label followed by its category,
/// e.g. `EVENT 3TEAM`. Labels repeat across categories, identities never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventIdentity(String);

impl EventIdentity {
    pub fn new(id: &str, category: Category) -> Self {
        Self(format!("{id}{}", category.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EventIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for EventIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepKind {
    Start,
    Zone,
    Finish,
    /// Any other marker; rendered with the neutral presentation.
    Other,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Start => "start",
            StepKind::Zone => "zone",
            StepKind::Finish => "finish",
            StepKind::Other => "other",
        }
    }
}

impl From<String> for StepKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "start" => StepKind::Start,
            "zone" => StepKind::Zone,
            "finish" => StepKind::Finish,
            _ => StepKind::Other,
        }
    }
}

impl From<StepKind> for String {
    fn from(kind: StepKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One waypoint of an event's floor plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Symbolic key into the icon set (see [`icons::icon_for_key`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Field bundle carried either by the event itself or by one of its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    pub movements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_map: Option<Vec<Step>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
}

/// Non-empty, insertion-ordered set of named variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariantSet(IndexMap<String, EventData>);

impl VariantSet {
    pub fn new(variants: IndexMap<String, EventData>) -> Result<Self, ModelError> {
        if variants.is_empty() {
            return Err(ModelError::EmptyVariants);
        }
        Ok(Self(variants))
    }

    /// The variant selected when nothing else has been chosen.
    pub fn default_key(&self) -> &str {
        // Non-empty by construction.
        self.0.keys().next().map(String::as_str).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&EventData> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventData)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Exactly one of the two shapes an event body can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventBody {
    Default(EventData),
    Variants(VariantSet),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord", into = "EventRecord")]
pub struct Event {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub time_cap: String,
    pub visual_map: Option<Vec<Step>>,
    pub flow: Option<String>,
    pub body: EventBody,
}

impl Event {
    pub fn identity(&self) -> EventIdentity {
        EventIdentity::new(&self.id, self.category)
    }

    pub fn default_data(&self) -> Option<&EventData> {
        match &self.body {
            EventBody::Default(data) => Some(data),
            EventBody::Variants(_) => None,
        }
    }

    pub fn variants(&self) -> Option<&VariantSet> {
        match &self.body {
            EventBody::Default(_) => None,
            EventBody::Variants(set) => Some(set),
        }
    }

    /// Initial variant selection, `None` for variant-less events.
    pub fn default_variant_key(&self) -> Option<&str> {
        self.variants().map(VariantSet::default_key)
    }

    /// Every movement line of the event, across all variants.
    pub fn all_movements(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match &self.body {
            EventBody::Default(data) => Box::new(data.movements.iter().map(String::as_str)),
            EventBody::Variants(set) => Box::new(
                set.0
                    .values()
                    .flat_map(|data| data.movements.iter().map(String::as_str)),
            ),
        }
    }
}

/// Flat wire shape of an [`Event`], matching the seed/remote JSON layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRecord {
    id: String,
    category: Category,
    title: String,
    time_cap: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visual_map: Option<Vec<Step>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_data: Option<EventData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variants: Option<IndexMap<String, EventData>>,
}

fn check_movements(
    identity: &EventIdentity,
    variant: Option<&str>,
    data: &EventData,
) -> Result<(), ModelError> {
    if data.movements.is_empty() {
        return Err(ModelError::EmptyMovements {
            identity: identity.clone(),
            variant: variant.map(str::to_string),
        });
    }
    Ok(())
}

impl TryFrom<EventRecord> for Event {
    type Error = ModelError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let identity = EventIdentity::new(&record.id, record.category);
        let body = match (record.default_data, record.variants) {
            (Some(_), Some(_)) => return Err(ModelError::AmbiguousBody(identity)),
            (None, None) => return Err(ModelError::MissingBody(identity)),
            (Some(data), None) => {
                check_movements(&identity, None, &data)?;
                EventBody::Default(data)
            }
            (None, Some(variants)) => {
                for (name, data) in &variants {
                    check_movements(&identity, Some(name), data)?;
                }
                EventBody::Variants(VariantSet::new(variants)?)
            }
        };

        Ok(Event {
            id: record.id,
            category: record.category,
            title: record.title,
            time_cap: record.time_cap,
            visual_map: record.visual_map,
            flow: record.flow,
            body,
        })
    }
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        let (default_data, variants) = match event.body {
            EventBody::Default(data) => (Some(data), None),
            EventBody::Variants(set) => (None, Some(set.0)),
        };
        EventRecord {
            id: event.id,
            category: event.category,
            title: event.title,
            time_cap: event.time_cap,
            visual_map: event.visual_map,
            flow: event.flow,
            default_data,
            variants,
        }
    }
}
