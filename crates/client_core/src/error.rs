use shared::error::{JobValidationError, ListingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("response from {path} is not valid json: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{message}")]
    Rejected {
        action: &'static str,
        message: String,
    },
    #[error(transparent)]
    InvalidJob(#[from] JobValidationError),
    #[error(transparent)]
    Listing(#[from] ListingError),
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    pub fn rejected(action: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            action,
            message: message.into(),
        }
    }
}
