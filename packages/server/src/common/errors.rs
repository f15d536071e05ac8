use thiserror::Error;

/// Domain-level failures that callers are expected to react to.
///
/// Lookup misses are not errors: they come back as `Option::None` / `false`.
/// Actions return `anyhow::Result`, so these travel inside `anyhow::Error`
/// and the HTTP layer recovers them with `downcast_ref`.
#[derive(Error, Debug)]
pub enum CrmError {
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl CrmError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}
