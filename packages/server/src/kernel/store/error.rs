use thiserror::Error;

/// Storage adapter failures.
///
/// Absence is never an error at this layer: `get`/`update` return `None`
/// and `delete` returns `false` when the key is not present.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(
        "table '{table}' requires a composite key (hash and range); \
         use the two-argument (userId, eventId) operations instead of single-id ones"
    )]
    CompositeKeyRequired { table: String },

    #[error("table '{table}' has a single-attribute key; got an unexpected range key")]
    UnexpectedRangeKey { table: String },

    #[error("table '{table}' has no index named '{index}'")]
    UnknownIndex { table: String, index: String },

    #[error("item for table '{table}' is missing key attribute '{attribute}'")]
    MissingKeyAttribute { table: String, attribute: String },

    #[error("key attribute '{attribute}' of table '{table}' cannot be updated")]
    KeyAttributeUpdate { table: String, attribute: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Misuse of the storage contract, as opposed to a backend failure.
    pub fn is_unsupported_operation(&self) -> bool {
        matches!(
            self,
            StoreError::CompositeKeyRequired { .. }
                | StoreError::UnexpectedRangeKey { .. }
                | StoreError::UnknownIndex { .. }
                | StoreError::KeyAttributeUpdate { .. }
        )
    }
}
