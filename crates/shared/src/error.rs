use thiserror::Error;

use crate::domain::SortKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("unsupported sort key '{0}'")]
    UnsupportedSortKey(String),
    #[error("sort key '{}' is not available on this listing", .0.as_str())]
    KeyNotInListing(SortKey),
    #[error("unrecognised sort mode '{0}'")]
    UnknownSortMode(String),
}

impl ListingError {
    /// Text shown to the operator when a sort request cannot be honoured.
    pub fn operator_message(&self) -> String {
        format!("Sorting error! ({self})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobValidationError {
    #[error("You need to select a file to render")]
    MissingFile,
    #[error("The job must have a name")]
    MissingName,
    #[error("Your frame range is backwards")]
    BackwardsRange,
}
