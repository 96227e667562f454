//! Error types for the options store.

/// Failures reported by [`OptionsStore`](super::OptionsStore).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `add` was called with a key that is already stored.
    #[error("The option key '{key}' already exists")]
    DuplicateKey { key: String },

    /// `update` or `delete` was called with a key that was never added.
    #[error("The option key '{key}' doesn't exist")]
    NonExistentOption { key: String },

    /// The configured table name is not a plain SQL identifier.
    #[error("Invalid options table name: '{0}'")]
    InvalidTableName(String),

    /// Any other persistence-layer failure, propagated unclassified.
    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
