pub mod commands;

use camino::Utf8PathBuf;
use clap::ValueEnum;
use wod_core::error::CatalogErrorKind;
use wod_core::patch::EDITABLE_FIELDS;
use wod_core::{CatalogError, CategoryFilter};

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum CliCategory {
    #[default]
    All,
    Indiv,
    Team,
}

impl From<CliCategory> for CategoryFilter {
    fn from(c: CliCategory) -> Self {
        match c {
            CliCategory::All => CategoryFilter::All,
            CliCategory::Indiv => CategoryFilter::Indiv,
            CliCategory::Team => CategoryFilter::Team,
        }
    }
}

/// Where edits are mirrored and the catalog is hydrated from.
#[derive(Debug, Clone, Default)]
pub enum RemoteTarget {
    #[default]
    None,
    Http { url: String, timeout_secs: u64 },
    Redb { root: Utf8PathBuf },
}

/// Follow-up advice for catalog errors surfaced by a command.
pub fn error_hint(err: &anyhow::Error) -> Option<String> {
    let err = err.downcast_ref::<CatalogError>()?;
    let hint = match err.kind() {
        CatalogErrorKind::NotFound => {
            "Run `wod list` for identities: event label plus category, e.g. \"EVENT 1INDIV\""
                .to_string()
        }
        CatalogErrorKind::UnresolvedVariant => {
            "Run `wod show <identity>` to see the variants it defines".to_string()
        }
        CatalogErrorKind::RejectedEdit => format!(
            "Only text values for {} can be edited",
            EDITABLE_FIELDS.join(", ")
        ),
    };
    Some(hint)
}
