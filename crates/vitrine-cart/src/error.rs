//! Error taxonomy for storefront operations.

use thiserror::Error;

/// Errors from the storefront endpoints.
///
/// Variants are `Clone` because a settlement may be broadcast to several
/// coalesced waiters; transport causes are carried as strings for the same
/// reason. None of these are retried automatically - they surface to the
/// owning surface, which converts them into inline display state.
#[derive(Debug, Clone, Error)]
pub enum StorefrontError {
    /// The platform rejected a cart mutation (non-2xx from add/change).
    #[error("cart mutation rejected ({status}): {message}")]
    Mutation {
        /// HTTP status of the rejection.
        status: u16,
        /// The platform's description of the failure, or generic copy.
        message: String,
        /// 1-based line the mutation targeted, when it targeted one.
        line: Option<u32>,
    },

    /// A product payload could not be loaded or understood.
    #[error("failed to load product '{handle}': {message}")]
    CatalogFetch {
        /// Handle the fetch was for.
        handle: String,
        /// What went wrong.
        message: String,
    },

    /// Re-rendered section fragments could not be fetched. The preceding
    /// mutation still succeeded; only the visual refresh is stale.
    #[error("failed to fetch rendered sections: {0}")]
    SectionRender(String),

    /// Network-level failure.
    #[error("http transport error: {0}")]
    Transport(String),

    /// A 2xx response with a payload that does not match the expected shape.
    #[error("unexpected payload: {0}")]
    Deserialize(String),
}

impl StorefrontError {
    /// The 1-based cart line this error is tied to, when any.
    pub fn line(&self) -> Option<u32> {
        match self {
            StorefrontError::Mutation { line, .. } => *line,
            _ => None,
        }
    }

    /// True for mutation rejections (the inline-message class of failures).
    pub fn is_mutation(&self) -> bool {
        matches!(self, StorefrontError::Mutation { .. })
    }
}

impl From<reqwest::Error> for StorefrontError {
    fn from(err: reqwest::Error) -> Self {
        StorefrontError::Transport(err.to_string())
    }
}
