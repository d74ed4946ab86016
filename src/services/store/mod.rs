//! Document store adapter.
//!
//! JSON documents addressed by collection path and id. Collection paths may
//! contain parent segments (`hc-05/<device>/readings`). Every handler performs
//! a small, bounded number of these operations; there are no cross-document
//! transactions, so multi-document updates are not atomic.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

mod firestore;
mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryDocumentStore;

/// Top-level fields of a document.
pub type Fields = serde_json::Map<String, Value>;

#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Fields,
}

/// Collection names used by the application.
pub mod collections {
    pub const USERS: &str = "users";
    pub const LOGIN_ATTEMPTS: &str = "login_attempts";
    pub const PROGRESOS: &str = "progresos";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("documento no encontrado")]
    NotFound,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Decode(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document; `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Fields>, StoreError>;

    /// Create or fully replace a document.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Create the document if absent, otherwise overwrite only the given
    /// top-level fields.
    async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Overwrite the given fields of an existing document;
    /// [`StoreError::NotFound`] if it does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// All documents of a collection.
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    /// Documents whose top-level `field` equals `value`.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, StoreError>;
}
