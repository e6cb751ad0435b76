//! Driven port for a generic document store.
//!
//! Records are JSON objects grouped in named collections. Every document
//! carries a string `id` field; filters are conjunctions of top-level field
//! equalities. Domain services own all record semantics; adapters only move
//! JSON objects.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::define_port_error;

/// A stored record.
pub type Document = Map<String, Value>;

/// Field holding the document identifier.
pub const ID_FIELD: &str = "id";

/// Collections used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Items,
    /// One marker per owner whose inventory has been offered starter items.
    StarterSeeds,
}

impl Collection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Items => "items",
            Self::StarterSeeds => "starter_seeds",
        }
    }
}

/// Equality filter over top-level document fields.
///
/// An empty filter matches every document.
///
/// # Examples
/// ```
/// use herbarium::domain::ports::Filter;
/// use serde_json::json;
///
/// let filter = Filter::new().eq("ownerId", "u-1").eq("name", "Mint");
/// let doc = json!({ "id": "i-1", "ownerId": "u-1", "name": "Mint" });
/// assert!(filter.matches(doc.as_object().unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Filter::new().eq("id", id)`.
    #[must_use]
    pub fn by_id(id: impl Into<Value>) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    /// Add a `field == value` clause.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Whether every clause holds for `document`.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

define_port_error! {
    /// Failures raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } => "document store connection failed: {message}",
        /// The store rejected or failed to run an operation.
        Query { message: String } => "document store query failed: {message}",
        /// A document was inserted without a string `id` field.
        MissingId { collection: String } => "document in {collection} has no id",
    }
}

/// Generic create/find/update/delete-by-filter store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in `collection` matching `filter`, in insertion order.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// First document matching `filter`, if any.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DocumentStoreError>;

    /// Store `document` and return its `id`.
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<String, DocumentStoreError>;

    /// Merge `patch` into every matching document; returns the match count.
    ///
    /// The `id` field is never overwritten.
    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Document,
    ) -> Result<u64, DocumentStoreError>;

    /// Remove every matching document; returns the number removed.
    async fn delete(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<u64, DocumentStoreError>;
}
