use uuid::Uuid;

/// Errors surfaced by [`RecipientStore`](crate::store::RecipientStore).
///
/// `Parse` never reaches callers of the load path: an unreadable collection is
/// logged and treated as empty. Everything else is returned as-is and never
/// retried inside the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A persisted value exists but is not a valid collection.
    #[error("stored value for '{key}' is not valid: {source}")]
    Parse {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A required field was empty. Nothing was written.
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    /// No recipient has this id. Nothing was written.
    #[error("recipient not found (id={id})")]
    NotFound { id: Uuid },

    /// The backend failed to read or write. In-memory state may be ahead of
    /// the persisted copy until a later write succeeds.
    #[error("storage failure on '{key}': {source}")]
    Storage {
        key: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to encode '{key}': {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
