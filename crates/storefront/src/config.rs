//! Storefront configuration.
//!
//! Fixed configuration handed to [`crate::state::StoreState`] at
//! construction: the cart storage slot, the store currency, the closed
//! coupon table, and the simulated catalog latency. There is no process
//! surface, so nothing is read from the environment.

use std::time::Duration;

use thiserror::Error;

use digital_store_core::CurrencyCode;

use crate::cart::{CouponBook, InvalidPercentError};

/// Default storage slot for the persisted cart snapshot.
pub const DEFAULT_CART_STORAGE_KEY: &str = "digital-store-cart";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The cart storage key is empty.
    #[error("cart storage key must not be empty")]
    EmptyStorageKey,
    /// A coupon in the table has an out-of-range percent-off.
    #[error("invalid coupon table: {0}")]
    InvalidCoupon(#[from] InvalidPercentError),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Storage slot key for the persisted cart snapshot.
    pub cart_storage_key: String,
    /// Currency all catalog prices and cart totals are denominated in.
    pub currency: CurrencyCode,
    /// The fixed coupon table.
    pub coupons: CouponBook,
    /// Simulated latency applied by the in-memory catalog.
    pub catalog_latency: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cart_storage_key: DEFAULT_CART_STORAGE_KEY.to_owned(),
            currency: CurrencyCode::BRL,
            coupons: CouponBook::default(),
            catalog_latency: Duration::ZERO,
        }
    }
}

impl StoreConfig {
    /// Create a configuration with a custom storage key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyStorageKey`] when the key is blank.
    pub fn new(cart_storage_key: impl Into<String>) -> Result<Self, ConfigError> {
        let cart_storage_key = cart_storage_key.into();
        if cart_storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(Self {
            cart_storage_key,
            ..Self::default()
        })
    }

    /// Replace the coupon table with the given code/percent pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCoupon`] when a percent is out of range.
    pub fn with_coupon_pairs<I, S>(mut self, pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        self.coupons = CouponBook::from_pairs(pairs)?;
        Ok(self)
    }

    /// Set the store currency.
    #[must_use]
    pub const fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Set the simulated catalog latency.
    #[must_use]
    pub const fn with_catalog_latency(mut self, latency: Duration) -> Self {
        self.catalog_latency = latency;
        self
    }
}
