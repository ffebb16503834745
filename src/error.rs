use std::sync::Arc;

use mongodb::bson;
use thiserror::Error;

/// Errors surfaced by a [`Cursor`](crate::Cursor) and its adapters.
///
/// Every variant is cheap to clone so a sticky error can be handed back by
/// each operation that observes it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("Decode error: {0}")]
    Decode(#[source] Arc<bson::de::Error>),

    #[error("Malformed document: {0}")]
    Malformed(#[source] Arc<bson::raw::Error>),

    #[error("Operation canceled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Invalid decode policy: {0}")]
    InvalidPolicy(u32),

    #[error("Bad config error: {0}")]
    BadConfig(#[source] Arc<serde_json::Error>),
}

impl Error {
    /// True for errors raised while turning a fetched document into a record.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_) | Error::Malformed(_))
    }
}

impl From<bson::de::Error> for Error {
    fn from(err: bson::de::Error) -> Self {
        Error::Decode(Arc::new(err))
    }
}

impl From<bson::raw::Error> for Error {
    fn from(err: bson::raw::Error) -> Self {
        Error::Malformed(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::BadConfig(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
