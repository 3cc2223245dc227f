//! Ordering and visibility of the rows in an asset or shot listing.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{CategoryTag, RowId, SortDirection, SortKey, SortMode},
    error::ListingError,
};
use tracing::{debug, warn};

/// One listing entry as rendered by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub name: String,
    #[serde(default)]
    pub type_name: String,
    pub category: CategoryTag,
    /// Text the free-text filter matches against; the name unless overridden.
    #[serde(default)]
    pub display_text: Option<String>,
    /// Selected option index of the owner control.
    #[serde(default)]
    pub owner: Option<usize>,
    /// Selected option index of the state control.
    #[serde(default)]
    pub state: Option<usize>,
    #[serde(default)]
    pub priority: Option<i64>,
}

impl Row {
    pub fn new(
        id: impl Into<RowId>,
        name: impl Into<String>,
        category: impl Into<CategoryTag>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_name: String::new(),
            category: category.into(),
            display_text: None,
            owner: None,
            state: None,
            priority: None,
        }
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn with_owner(mut self, ordinal: usize) -> Self {
        self.owner = Some(ordinal);
        self
    }

    pub fn with_state(mut self, ordinal: usize) -> Self {
        self.state = Some(ordinal);
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_display_text(mut self, text: impl Into<String>) -> Self {
        self.display_text = Some(text.into());
        self
    }

    pub fn display_text(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.name)
    }

    fn primary_cmp(&self, other: &Self, key: SortKey) -> Ordering {
        match key {
            SortKey::Name => self.name.cmp(&other.name),
            SortKey::Type => self.type_name.cmp(&other.type_name),
            // Rows lacking a value sort ahead of every row that has one.
            SortKey::Owner => self.owner.cmp(&other.owner),
            SortKey::State => self.state.cmp(&other.state),
            SortKey::Priority => self.priority.cmp(&other.priority),
        }
    }
}

/// The sort keys a listing's columns can provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingProfile {
    supported: Vec<SortKey>,
}

impl ListingProfile {
    pub fn new(supported: impl IntoIterator<Item = SortKey>) -> Self {
        Self {
            supported: supported.into_iter().collect(),
        }
    }

    pub fn assets() -> Self {
        Self::new(SortKey::ALL)
    }

    pub fn shots() -> Self {
        Self::new([SortKey::Name, SortKey::Owner])
    }

    pub fn supports(&self, key: SortKey) -> bool {
        self.supported.contains(&key)
    }

    pub fn check(&self, mode: SortMode) -> Result<(), ListingError> {
        if self.supports(mode.key) {
            Ok(())
        } else {
            Err(ListingError::KeyNotInListing(mode.key))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    /// Toggle state per category; a tag missing here is treated as disabled.
    pub categories: BTreeMap<CategoryTag, bool>,
    pub text_filter: String,
    pub sort_mode: SortMode,
}

impl FilterState {
    pub fn all_enabled(categories: impl IntoIterator<Item = CategoryTag>) -> Self {
        Self {
            categories: categories.into_iter().map(|tag| (tag, true)).collect(),
            ..Self::default()
        }
    }

    pub fn is_enabled(&self, tag: &CategoryTag) -> bool {
        self.categories.get(tag).copied().unwrap_or(false)
    }

    pub fn enabled_categories(&self) -> impl Iterator<Item = &CategoryTag> {
        self.categories
            .iter()
            .filter_map(|(tag, enabled)| enabled.then_some(tag))
    }

    /// Category gate first; the text filter is only consulted for rows whose
    /// category is enabled.
    pub fn is_visible(&self, row: &Row) -> bool {
        if !self.is_enabled(&row.category) {
            return false;
        }
        if self.text_filter.is_empty() {
            return true;
        }
        row.display_text()
            .to_lowercase()
            .contains(&self.text_filter.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: RowId,
    pub visible: bool,
}

/// Full top-to-bottom order of a listing with each row's visibility.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Arrangement {
    pub placements: Vec<Placement>,
}

impl Arrangement {
    pub fn order(&self) -> Vec<&RowId> {
        self.placements.iter().map(|p| &p.id).collect()
    }

    pub fn visible(&self) -> Vec<&RowId> {
        self.placements
            .iter()
            .filter(|p| p.visible)
            .map(|p| &p.id)
            .collect()
    }

    pub fn is_visible(&self, id: &RowId) -> Option<bool> {
        self.placements
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.visible)
    }
}

/// Primary key ascending, name as tie-break, and descending mode reverses
/// the combined result.
pub fn compare_rows(lhs: &Row, rhs: &Row, mode: SortMode) -> Ordering {
    let combined = lhs
        .primary_cmp(rhs, mode.key)
        .then_with(|| lhs.name.cmp(&rhs.name));
    match mode.direction {
        SortDirection::Ascending => combined,
        SortDirection::Descending => combined.reverse(),
    }
}

/// Sorts `rows` in place and computes visibility under `filter`.
pub fn arrange(
    rows: &mut [Row],
    filter: &FilterState,
    profile: &ListingProfile,
) -> Result<Arrangement, ListingError> {
    profile.check(filter.sort_mode)?;
    let mode = filter.sort_mode;
    rows.sort_by(|lhs, rhs| compare_rows(lhs, rhs, mode));
    Ok(Arrangement {
        placements: rows
            .iter()
            .map(|row| Placement {
                id: row.id.clone(),
                visible: filter.is_visible(row),
            })
            .collect(),
    })
}

pub struct SortFilterEngine {
    profile: ListingProfile,
    rows: Vec<Row>,
    filter: FilterState,
    arrangement: Arrangement,
}

impl SortFilterEngine {
    /// Every category seen on a row, plus any extra toggles in `categories`,
    /// starts enabled.
    pub fn new(
        profile: ListingProfile,
        rows: Vec<Row>,
        categories: impl IntoIterator<Item = CategoryTag>,
    ) -> Self {
        let tags = rows
            .iter()
            .map(|row| row.category.clone())
            .chain(categories)
            .collect::<Vec<_>>();
        let arrangement = Arrangement {
            placements: rows
                .iter()
                .map(|row| Placement {
                    id: row.id.clone(),
                    visible: true,
                })
                .collect(),
        };
        Self {
            profile,
            rows,
            filter: FilterState::all_enabled(tags),
            arrangement,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn profile(&self) -> &ListingProfile {
        &self.profile
    }

    /// The arrangement most recently applied.
    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn row_mut(&mut self, id: &RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| &row.id == id)
    }

    pub fn recompute(&mut self) -> Result<&Arrangement, ListingError> {
        match arrange(&mut self.rows, &self.filter, &self.profile) {
            Ok(arrangement) => {
                debug!(
                    mode = %self.filter.sort_mode,
                    visible = arrangement.visible().len(),
                    total = arrangement.placements.len(),
                    "listing recomputed"
                );
                self.arrangement = arrangement;
                Ok(&self.arrangement)
            }
            Err(err) => {
                warn!(mode = %self.filter.sort_mode, error = %err, "listing left in prior order");
                Err(err)
            }
        }
    }

    pub fn set_category_enabled(
        &mut self,
        tag: &CategoryTag,
        enabled: bool,
    ) -> Result<&Arrangement, ListingError> {
        self.filter.categories.insert(tag.clone(), enabled);
        self.recompute()
    }

    pub fn toggle(&mut self, tag: &CategoryTag) -> Result<&Arrangement, ListingError> {
        let enabled = !self.filter.is_enabled(tag);
        self.set_category_enabled(tag, enabled)
    }

    /// Disables every other category and enables only `tag`.
    pub fn select_only(&mut self, tag: &CategoryTag) -> Result<&Arrangement, ListingError> {
        for enabled in self.filter.categories.values_mut() {
            *enabled = false;
        }
        self.set_category_enabled(tag, true)
    }

    pub fn set_text_filter(
        &mut self,
        text: impl Into<String>,
    ) -> Result<&Arrangement, ListingError> {
        self.filter.text_filter = text.into();
        self.recompute()
    }

    /// An unsupported mode leaves both the current mode and the listing
    /// untouched.
    pub fn set_sort_mode(&mut self, mode: SortMode) -> Result<&Arrangement, ListingError> {
        if let Err(err) = self.profile.check(mode) {
            warn!(%mode, error = %err, "sort mode rejected");
            return Err(err);
        }
        self.filter.sort_mode = mode;
        self.recompute()
    }

    /// Applies the raw value of the sort selector, e.g. `priority_dsc`.
    pub fn set_sort_control(&mut self, raw: &str) -> Result<&Arrangement, ListingError> {
        let mode = raw.parse::<SortMode>().inspect_err(|err| {
            warn!(raw, error = %err, "sort control value rejected");
        })?;
        self.set_sort_mode(mode)
    }
}

#[cfg(test)]
#[path = "tests/sort_filter_tests.rs"]
mod tests;
