//! Store state shared across the UI tree.
//!
//! `StoreState` is the explicitly owned object injected at the UI tree root:
//! it wires the cart store to its storage slot and fronts the catalog with a
//! stale-response guard. It is cheaply cloneable via `Arc`.

use std::sync::Arc;

use tracing::{error, instrument};

use digital_store_core::{Product, ProductId};

use crate::cart::CartStore;
use crate::catalog::{CatalogLoader, LoadOutcome, ProductCatalog};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::listing::FilterCriteria;
use crate::storage::SlotStorage;

/// Store state shared across the whole UI.
#[derive(Clone)]
pub struct StoreState {
    inner: Arc<StoreStateInner>,
}

struct StoreStateInner {
    config: StoreConfig,
    cart: CartStore,
    catalog: Arc<dyn ProductCatalog>,
    loader: CatalogLoader,
}

impl StoreState {
    /// Create the state, restoring the cart from the storage slot.
    #[must_use]
    pub fn new(
        config: StoreConfig,
        catalog: Arc<dyn ProductCatalog>,
        storage: Arc<dyn SlotStorage>,
    ) -> Self {
        let cart = CartStore::new(
            storage,
            config.cart_storage_key.clone(),
            config.coupons.clone(),
            config.currency,
        );

        Self {
            inner: Arc::new(StoreStateInner {
                config,
                cart,
                catalog,
                loader: CatalogLoader::new(),
            }),
        }
    }

    /// Create the state over the stock fixture catalog, applying the
    /// configured simulated latency.
    #[must_use]
    pub fn with_fixture_catalog(config: StoreConfig, storage: Arc<dyn SlotStorage>) -> Self {
        let catalog = Arc::new(
            crate::catalog::InMemoryCatalog::with_fixtures().with_latency(config.catalog_latency),
        );
        Self::new(config, catalog, storage)
    }

    /// Get a reference to the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn ProductCatalog {
        self.inner.catalog.as_ref()
    }

    /// Fetch the full product list, guarded against stale completion.
    ///
    /// A result that resolves after a newer load has begun comes back as
    /// [`LoadOutcome::Stale`] and must be discarded by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Catalog`] when the catalog cannot answer; the
    /// caller renders an error state with a retry affordance.
    #[instrument(skip(self))]
    pub async fn load_products(&self) -> Result<LoadOutcome<Vec<Product>>> {
        let ticket = self.inner.loader.begin();
        let products = self.inner.catalog.fetch_all().await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch product list");
        })?;
        Ok(self.inner.loader.complete(ticket, products))
    }

    /// Fetch the product list and run the listing pipeline over it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Catalog`] when the catalog cannot answer.
    #[instrument(skip(self, criteria))]
    pub async fn load_listing(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<LoadOutcome<Vec<Product>>> {
        let ticket = self.inner.loader.begin();
        let products = self.inner.catalog.fetch_all().await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch product list for listing");
        })?;
        Ok(self.inner.loader.complete(ticket, criteria.apply(&products)))
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the id is unknown and
    /// [`StoreError::Catalog`] when the catalog cannot answer.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn load_product(&self, id: &ProductId) -> Result<Product> {
        self.inner
            .catalog
            .fetch_by_id(id)
            .await
            .inspect_err(|e| {
                error!(error = %e, "Failed to fetch product");
            })?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::InMemoryCatalog;
    use crate::storage::MemoryStorage;

    use super::*;

    fn state() -> StoreState {
        StoreState::new(
            StoreConfig::default(),
            Arc::new(InMemoryCatalog::with_fixtures()),
            Arc::new(MemoryStorage::new()),
        )
    }

    #[tokio::test]
    async fn test_load_products_is_fresh_without_competing_loads() {
        let state = state();
        let outcome = state.load_products().await.expect("load");
        let products = outcome.into_fresh().expect("fresh");
        assert_eq!(products.len(), 8);
    }

    #[tokio::test]
    async fn test_load_product_not_found() {
        let state = state();
        let err = state
            .load_product(&ProductId::new("999"))
            .await
            .expect_err("unknown id");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_listing_applies_criteria() {
        let state = state();
        let criteria = FilterCriteria::new().with_brand("Nike");
        let listing = state
            .load_listing(&criteria)
            .await
            .expect("load")
            .into_fresh()
            .expect("fresh");
        assert_eq!(listing.len(), 2);
        assert!(listing.iter().all(|p| p.brand.as_deref() == Some("Nike")));
    }

    #[tokio::test]
    async fn test_catalog_failure_surfaces_as_store_error() {
        let catalog = Arc::new(InMemoryCatalog::with_fixtures());
        let state = StoreState::new(
            StoreConfig::default(),
            Arc::clone(&catalog) as Arc<dyn ProductCatalog>,
            Arc::new(MemoryStorage::new()),
        );
        catalog.set_unavailable(true);

        let err = state.load_products().await.expect_err("outage");
        assert!(matches!(err, StoreError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_cart_is_wired_to_config() {
        let state = state();
        assert!(state.cart().apply_coupon("promo20"));
        assert_eq!(state.cart().coupon_percent(), 20);
    }
}
