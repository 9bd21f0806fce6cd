use crate::{Category, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Indiv,
    Team,
}

impl CategoryFilter {
    pub fn admits(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Indiv => category == Category::Indiv,
            CategoryFilter::Team => category == Category::Team,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryFilter::All => "ALL",
            CategoryFilter::Indiv => "INDIV",
            CategoryFilter::Team => "TEAM",
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        match category {
            Category::Indiv => CategoryFilter::Indiv,
            Category::Team => CategoryFilter::Team,
        }
    }
}

/// Normalized free-text query. Blank input matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SearchQuery {
    needle: Option<String>,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        let needle = if raw.trim().is_empty() {
            None
        } else {
            Some(raw.to_lowercase())
        };
        Self { needle }
    }

    pub fn is_blank(&self) -> bool {
        self.needle.is_none()
    }

    /// Lowercased needle, empty when blank.
    pub fn needle(&self) -> &str {
        self.needle.as_deref().unwrap_or_default()
    }

    /// Text predicate only; the category constraint is applied by [`filter`].
    pub fn matches(&self, event: &Event) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };
        let hit = |text: &str| text.to_lowercase().contains(needle);

        hit(event.title.as_str()) || hit(event.id.as_str()) || event.all_movements().any(hit)
    }
}

/// Catalog positions of the events passing `category` and `query`, in
/// catalog order.
pub fn filter_positions(
    catalog: &[Event],
    category: CategoryFilter,
    query: &SearchQuery,
) -> Vec<usize> {
    catalog
        .iter()
        .enumerate()
        .filter(|(_, event)| category.admits(event.category) && query.matches(event))
        .map(|(ix, _)| ix)
        .collect()
}

/// Stable filter over the catalog: category first, then case-insensitive
/// substring search over title, id and every movement line.
pub fn filter<'a>(
    catalog: &'a [Event],
    category: CategoryFilter,
    query: &str,
) -> Vec<&'a Event> {
    let query = SearchQuery::new(query);
    filter_positions(catalog, category, &query)
        .into_iter()
        .map(|ix| &catalog[ix])
        .collect()
}
