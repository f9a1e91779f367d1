//! The product record served by the catalog.
//!
//! Products are immutable snapshots: the cart copies them at add-time, so a
//! later catalog change never retroactively alters cart contents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Rating summary attached to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Average star rating, 0 to 5.
    pub stars: Decimal,
    /// Total number of ratings.
    pub count: u32,
}

impl Rating {
    /// Maximum star value.
    pub const MAX_STARS: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

    /// Create a rating summary.
    #[must_use]
    pub const fn new(stars: Decimal, count: u32) -> Self {
        Self { stars, count }
    }

    /// Clamp the star value into the `0..=5` range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            stars: self.stars.clamp(Decimal::ZERO, Self::MAX_STARS),
            count: self.count,
        }
    }
}

/// A product as served by the catalog.
///
/// `price` must be positive; `price_discount` only takes effect when it is
/// strictly lower than `price` (see [`Product::effective_price`]). Optional
/// tag fields (`category`, `brand`, `gender`) are `None` when the catalog
/// has no value for them - the listing pipeline treats missing tags as
/// non-matching once that filter dimension is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Image reference (URL or asset path).
    pub image: String,
    /// List price.
    pub price: Price,
    /// Discounted price, effective only when strictly below `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_discount: Option<Price>,
    /// Long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category tag used by the listing filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Brand tag used by the listing filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Gender tag used by the listing filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Merchant reference code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Rating summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// Create a product with only the required fields set.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        image: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            price,
            price_discount: None,
            description: None,
            category: None,
            brand: None,
            gender: None,
            reference: None,
            rating: None,
        }
    }

    /// Set the discounted price.
    #[must_use]
    pub const fn with_discount(mut self, price_discount: Price) -> Self {
        self.price_discount = Some(price_discount);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category tag.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the brand tag.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set the gender tag.
    #[must_use]
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Set the merchant reference code.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Set the rating summary.
    #[must_use]
    pub const fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Whether the discount takes effect (present and strictly below list price).
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.price_discount
            .is_some_and(|d| d.amount < self.price.amount)
    }

    /// The price a buyer actually pays: the discounted price when it is
    /// present and strictly lower than the list price, else the list price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        if self.has_discount() {
            self.price_discount.unwrap_or(self.price)
        } else {
            self.price
        }
    }

    /// Normalize optional fields at the catalog boundary.
    ///
    /// Malformed optional data is defaulted rather than propagated:
    /// - a discount that is non-positive or not strictly below the list
    ///   price is dropped;
    /// - empty or whitespace-only tag strings become `None`;
    /// - rating stars are clamped into `0..=5`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if let Some(discount) = self.price_discount
            && (discount.amount <= Decimal::ZERO || discount.amount >= self.price.amount)
        {
            self.price_discount = None;
        }

        self.description = trim_to_none(self.description);
        self.category = trim_to_none(self.category);
        self.brand = trim_to_none(self.brand);
        self.gender = trim_to_none(self.gender);
        self.reference = trim_to_none(self.reference);

        self.rating = self.rating.map(Rating::clamped);
        self
    }
}

/// Trim an optional string, mapping empty results to `None`.
fn trim_to_none(value: Option<String>) -> Option<String> {
    match value {
        Some(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else if trimmed.len() == s.len() {
                Some(s)
            } else {
                Some(trimmed.to_owned())
            }
        }
        None => None,
    }
}
