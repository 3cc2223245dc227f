//! A listing page: one binding per editable cell plus the sort/filter
//! engine over its rows.

use std::{collections::HashMap, sync::Arc};

use shared::{
    domain::{CategoryTag, FieldKey, ResourcePath, RowId, SortKey, SortMode},
    error::ListingError,
};
use tracing::warn;

use crate::{
    field_binding::{BindOptions, ControlHandle, ControlValue, FieldBinding},
    indicator::Indicator,
    sort_filter::{Arrangement, ListingProfile, Row, SortFilterEngine},
    transport::StoreTransport,
};

/// Applies a computed arrangement to whatever draws the listing.
pub trait ListingView: Send + Sync {
    fn apply(&self, arrangement: &Arrangement);
}

/// Operator-visible error reporting.
pub trait OperatorNotifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// An editable cell of a row. `sort_column` names the sort key whose value
/// is read back from this cell's control when the listing is recomputed.
pub struct CellSpec {
    pub key: FieldKey,
    pub control: ControlHandle,
    pub sort_column: Option<SortKey>,
}

impl CellSpec {
    pub fn new(key: impl Into<FieldKey>, control: ControlHandle) -> Self {
        Self {
            key: key.into(),
            control,
            sort_column: None,
        }
    }

    pub fn sorting(mut self, column: SortKey) -> Self {
        self.sort_column = Some(column);
        self
    }
}

pub struct ListingRow {
    pub row: Row,
    pub resource: ResourcePath,
    pub cells: Vec<CellSpec>,
}

struct BoundCell {
    binding: FieldBinding,
    sort_column: Option<SortKey>,
}

pub struct ListController {
    engine: SortFilterEngine,
    cells: HashMap<RowId, Vec<BoundCell>>,
    view: Arc<dyn ListingView>,
    notifier: Arc<dyn OperatorNotifier>,
}

impl ListController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        profile: ListingProfile,
        rows: Vec<ListingRow>,
        categories: impl IntoIterator<Item = CategoryTag>,
        transport: Arc<dyn StoreTransport>,
        indicator: Arc<dyn Indicator>,
        options: BindOptions,
        view: Arc<dyn ListingView>,
        notifier: Arc<dyn OperatorNotifier>,
    ) -> Self {
        let mut cells = HashMap::with_capacity(rows.len());
        let mut plain_rows = Vec::with_capacity(rows.len());

        for listing_row in rows {
            let bound = listing_row
                .cells
                .into_iter()
                .map(|cell| BoundCell {
                    binding: FieldBinding::bind(
                        cell.control,
                        listing_row.resource.clone(),
                        cell.key,
                        Arc::clone(&transport),
                        Arc::clone(&indicator),
                        options,
                    ),
                    sort_column: cell.sort_column,
                })
                .collect();
            cells.insert(listing_row.row.id.clone(), bound);
            plain_rows.push(listing_row.row);
        }

        Self {
            engine: SortFilterEngine::new(profile, plain_rows, categories),
            cells,
            view,
            notifier,
        }
    }

    pub fn engine(&self) -> &SortFilterEngine {
        &self.engine
    }

    pub fn binding(&self, row: &RowId, key: &FieldKey) -> Option<&FieldBinding> {
        self.cells
            .get(row)?
            .iter()
            .map(|cell| &cell.binding)
            .find(|binding| &binding.field().key == key)
    }

    pub fn binding_mut(&mut self, row: &RowId, key: &FieldKey) -> Option<&mut FieldBinding> {
        self.cells
            .get_mut(row)?
            .iter_mut()
            .map(|cell| &mut cell.binding)
            .find(|binding| &binding.field().key == key)
    }

    /// Routes a user edit to the cell's binding. Returns `false` when the
    /// row has no such cell.
    pub fn edit_cell(&mut self, row: &RowId, key: &FieldKey, value: ControlValue) -> bool {
        match self.binding_mut(row, key) {
            Some(binding) => {
                binding.edit(value);
                true
            }
            None => {
                warn!(row = %row, key = %key, "edit for unbound cell ignored");
                false
            }
        }
    }

    pub fn toggle_category(&mut self, tag: &CategoryTag) {
        self.sync_sort_values();
        let result = self.engine.toggle(tag).cloned();
        self.present(result);
    }

    pub fn select_only(&mut self, tag: &CategoryTag) {
        self.sync_sort_values();
        let result = self.engine.select_only(tag).cloned();
        self.present(result);
    }

    pub fn set_text_filter(&mut self, text: &str) {
        self.sync_sort_values();
        let result = self.engine.set_text_filter(text).cloned();
        self.present(result);
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sync_sort_values();
        let result = self.engine.set_sort_mode(mode).cloned();
        self.present(result);
    }

    pub fn set_sort_control(&mut self, raw: &str) {
        self.sync_sort_values();
        let result = self.engine.set_sort_control(raw).cloned();
        self.present(result);
    }

    pub fn refresh(&mut self) {
        self.sync_sort_values();
        let result = self.engine.recompute().cloned();
        self.present(result);
    }

    /// Waits for every scheduled write in the listing to land.
    pub async fn settle(&mut self) {
        for cell in self.cells.values_mut().flatten() {
            cell.binding.settle().await;
        }
    }

    fn present(&self, result: Result<Arrangement, ListingError>) {
        match result {
            Ok(arrangement) => self.view.apply(&arrangement),
            Err(err) => self.notifier.alert(&err.operator_message()),
        }
    }

    /// Copies the live owner/state/priority selections into the engine's
    /// rows so sorting sees what the user currently has selected.
    fn sync_sort_values(&mut self) {
        for (row_id, cells) in &self.cells {
            let Some(row) = self.engine.row_mut(row_id) else {
                continue;
            };
            for cell in cells {
                let Some(column) = cell.sort_column else {
                    continue;
                };
                let value = cell.binding.control().get();
                match column {
                    SortKey::Owner => row.owner = value.ordinal(),
                    SortKey::State => row.state = value.ordinal(),
                    SortKey::Priority => row.priority = value.as_integer(),
                    SortKey::Name => {
                        if let ControlValue::Text(text) = value {
                            row.name = text;
                        }
                    }
                    SortKey::Type => {
                        if let ControlValue::Text(text) | ControlValue::Select { value: text, .. } =
                            value
                        {
                            row.type_name = text;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/list_controller_tests.rs"]
mod tests;
