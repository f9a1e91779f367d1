//! Product catalog collaborator.
//!
//! The catalog is an external, read-only source of product records. The core
//! consumes it through two async operations: fetch-all and fetch-by-id. Both
//! may fail; callers render an error state rather than crash.

mod loader;
mod memory;

pub use loader::{CatalogLoader, LoadOutcome, LoadTicket};
pub use memory::InMemoryCatalog;

use async_trait::async_trait;
use thiserror::Error;

use digital_store_core::{Product, ProductId};

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be reached or refused to answer.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Async source of product records.
///
/// Implementations must hand out boundary-normalized records (see
/// [`Product::normalized`]) so malformed optional fields never reach the
/// listing pipeline or the cart.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] when the catalog cannot answer.
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError>;

    /// Fetch a single product by id; `None` when no such product exists.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] when the catalog cannot answer.
    async fn fetch_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "catalog unavailable: connection refused");
    }
}
