//! Unified error type for store-level operations.
//!
//! Collaborator modules define their own errors ([`CatalogError`],
//! [`crate::storage::StorageError`], [`crate::config::ConfigError`]);
//! [`StoreError`] aggregates what can surface from [`crate::state`]
//! operations. Expected conditions (invalid coupon, quantity below one,
//! removing an absent item) are sentinel returns, never errors.
//!
//! [`CatalogError`]: crate::catalog::CatalogError

use thiserror::Error;

use crate::catalog::CatalogError;

/// Store-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Catalog operation failed; the caller renders an inline error state
    /// with a retry affordance.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A requested product does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
