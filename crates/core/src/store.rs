use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::filter::GiftQuery;
use crate::lookup::Lookup;
use crate::types::Gift;

/// Name of the collection every gift lives in.
pub const GIFTS_COLLECTION: &str = "gifts";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not connect to the document store: {0}")]
    Connection(String),

    #[error("Document store error: {0}")]
    Backend(String),

    #[error("Document must be a JSON object, got {0}")]
    InvalidDocument(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(feature = "mongo")]
impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Handle to the gifts collection.
///
/// Implementations own their connection management; every method may be called
/// concurrently from independent requests.
#[async_trait]
pub trait GiftStore: Send + Sync {
    /// Every document, in store order.
    async fn all(&self) -> Result<Vec<Gift>, StoreError>;

    /// First document matching a single identifier predicate.
    async fn find_one(&self, lookup: &Lookup) -> Result<Option<Gift>, StoreError>;

    /// Insert a document verbatim, returning the store-assigned `_id` (as JSON).
    async fn insert(&self, document: Value) -> Result<Value, StoreError>;

    /// Documents matching every set field of `query`.
    async fn search(&self, query: &GiftQuery) -> Result<Vec<Gift>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Kind of a JSON value, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
