use crate::{CatalogError, Event, EventBody, EventData, Step};

/// Field set shown for an event once a variant has been picked and the
/// event-level fallbacks applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveFields<'a> {
    /// Variant the fields were taken from, `None` for variant-less events.
    pub variant: Option<&'a str>,
    pub movements: &'a [String],
    pub load: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub visual_map: Option<&'a [Step]>,
    pub flow: Option<&'a str>,
}

/// Resolve the effective fields of `event` for the selected variant.
///
/// Variant-less events ignore `selected_variant`. For variant events the key
/// must name one of the variants, otherwise [`CatalogError::UnresolvedVariant`]
/// is returned and nothing is resolved.
pub fn resolve<'a>(
    event: &'a Event,
    selected_variant: &str,
) -> Result<EffectiveFields<'a>, CatalogError> {
    match &event.body {
        EventBody::Default(data) => Ok(overlay(event, None, data)),
        EventBody::Variants(set) => {
            let (key, data) = set
                .iter()
                .find(|(name, _)| *name == selected_variant)
                .ok_or_else(|| CatalogError::UnresolvedVariant {
                    identity: event.identity(),
                    key: selected_variant.to_string(),
                })?;
            Ok(overlay(event, Some(key), data))
        }
    }
}

/// Resolve with the deterministic default selection (first variant).
pub fn resolve_default(event: &Event) -> Result<EffectiveFields<'_>, CatalogError> {
    resolve(event, event.default_variant_key().unwrap_or_default())
}

fn overlay<'a>(
    event: &'a Event,
    variant: Option<&'a str>,
    data: &'a EventData,
) -> EffectiveFields<'a> {
    EffectiveFields {
        variant,
        movements: &data.movements,
        load: data.load.as_deref(),
        notes: data.notes.as_deref(),
        visual_map: data.visual_map.as_deref().or(event.visual_map.as_deref()),
        // A blank variant flow does not hide the event's.
        flow: data
            .flow
            .as_deref()
            .filter(|flow| !flow.is_empty())
            .or(event.flow.as_deref()),
    }
}
