//! In-memory catalog backed by a fixed product list.
//!
//! Stands in for the real product service: returns a fixture list after an
//! optional simulated delay, and can be flipped into an unavailable state to
//! exercise error paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::{Decimal, dec};
use tracing::instrument;

use digital_store_core::{CurrencyCode, Price, Product, ProductId, Rating};

use super::{CatalogError, ProductCatalog};

/// Product catalog served from memory.
pub struct InMemoryCatalog {
    products: Vec<Product>,
    latency: Duration,
    unavailable: AtomicBool,
}

impl InMemoryCatalog {
    /// Create a catalog from the given products.
    ///
    /// Records are normalized at this boundary: malformed optional fields
    /// are defaulted instead of propagated.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(Product::normalized).collect(),
            latency: Duration::ZERO,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Create a catalog with the stock sneaker fixtures.
    #[must_use]
    pub fn with_fixtures() -> Self {
        Self::new(fixtures())
    }

    /// Simulate network latency on every fetch.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Toggle the unavailable state; while set, every fetch fails.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    async fn check_ready(&self) -> Result<(), CatalogError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable(
                "simulated outage".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        self.check_ready().await?;
        Ok(self.products.clone())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn fetch_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        self.check_ready().await?;
        Ok(self.products.iter().find(|p| &p.id == id).cloned())
    }
}

fn brl(amount: Decimal) -> Price {
    Price::new(amount, CurrencyCode::BRL)
}

/// The stock catalog: eight sneakers, half of them discounted.
fn fixtures() -> Vec<Product> {
    vec![
        Product::new(
            "1",
            "Tênis Nike Revolution 6 Next Nature Masculino",
            "assets/produc-image-1.jpeg",
            brl(dec!(299.9)),
        )
        .with_discount(brl(dec!(219.9)))
        .with_category("Tênis")
        .with_brand("Nike")
        .with_gender("Masculino")
        .with_reference("38416711")
        .with_rating(Rating::new(dec!(4.7), 90)),
        Product::new(
            "2",
            "Tênis Nike Air Max AP Masculino",
            "assets/produc-image-2.jpeg",
            brl(dec!(449.9)),
        )
        .with_discount(brl(dec!(399.9)))
        .with_category("Tênis")
        .with_brand("Nike")
        .with_gender("Masculino")
        .with_reference("38416712")
        .with_rating(Rating::new(dec!(4.5), 120)),
        Product::new(
            "3",
            "Tênis Adidas Ultraboost 22",
            "assets/produc-image-3.jpeg",
            brl(dec!(599.9)),
        )
        .with_category("Tênis")
        .with_brand("Adidas")
        .with_reference("38416713")
        .with_rating(Rating::new(dec!(4.8), 85)),
        Product::new(
            "4",
            "Tênis Puma RS-X",
            "assets/produc-image-4.jpeg",
            brl(dec!(349.9)),
        )
        .with_discount(brl(dec!(279.9)))
        .with_category("Tênis")
        .with_brand("Puma")
        .with_reference("38416714")
        .with_rating(Rating::new(dec!(4.3), 65)),
        Product::new(
            "5",
            "Tênis New Balance 574",
            "assets/produc-image-5.jpeg",
            brl(dec!(499.9)),
        )
        .with_discount(brl(dec!(429.9)))
        .with_category("Tênis")
        .with_brand("New Balance")
        .with_reference("38416715")
        .with_rating(Rating::new(dec!(4.6), 110)),
        Product::new(
            "6",
            "Tênis Asics Gel-Kayano 29",
            "assets/produc-image-1.jpeg",
            brl(dec!(799.9)),
        )
        .with_category("Tênis")
        .with_brand("Asics")
        .with_reference("38416716")
        .with_rating(Rating::new(dec!(4.9), 95)),
        Product::new(
            "7",
            "Tênis Reebok Classic Leather",
            "assets/produc-image-2.jpeg",
            brl(dec!(379.9)),
        )
        .with_discount(brl(dec!(299.9)))
        .with_category("Tênis")
        .with_brand("Reebok")
        .with_reference("38416717")
        .with_rating(Rating::new(dec!(4.4), 75)),
        Product::new(
            "8",
            "Tênis Mizuno Wave Prophecy",
            "assets/produc-image-3.jpeg",
            brl(dec!(899.9)),
        )
        .with_discount(brl(dec!(749.9)))
        .with_category("Tênis")
        .with_brand("Mizuno")
        .with_reference("38416718")
        .with_rating(Rating::new(dec!(4.7), 100)),
    ]
}
