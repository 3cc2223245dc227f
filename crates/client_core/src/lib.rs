//! Client-side core of the production tracker pages: debounced field
//! synchronisation against the `/store` endpoint, and the sort/filter engine
//! behind the asset and shot listings.

pub mod actions;
pub mod config;
pub mod error;
pub mod field_binding;
pub mod indicator;
pub mod list_controller;
pub mod selector;
pub mod sort_filter;
pub mod transport;

pub use actions::ActionClient;
pub use config::{load_settings, ClientSettings};
pub use error::ClientError;
pub use field_binding::{
    BindOptions, CheckboxItem, ControlHandle, ControlValue, Field, FieldBinding,
};
pub use indicator::{Indicator, TracingIndicator};
pub use list_controller::{CellSpec, ListController, ListingRow, ListingView, OperatorNotifier};
pub use selector::FileSelector;
pub use sort_filter::{Arrangement, FilterState, ListingProfile, Placement, Row, SortFilterEngine};
pub use transport::{HttpTransport, StoreTransport};
