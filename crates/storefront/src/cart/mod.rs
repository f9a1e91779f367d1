//! Cart store: single source of truth for cart contents and totals.
//!
//! The store owns the line items, the active coupon, and the shipping cost,
//! and recomputes the derived totals on every mutation. Every change to the
//! item list is persisted best-effort to a storage slot; persistence
//! failures are swallowed and the cart keeps working in-memory. Observers
//! subscribe to a watch channel carrying [`CartTotals`] snapshots instead of
//! assuming any particular UI binding.

mod coupon;

pub use coupon::{AppliedCoupon, CouponBook, InvalidPercentError};

use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use digital_store_core::{CurrencyCode, Price, Product, ProductId};

use crate::storage::SlotStorage;

/// One line in the cart: a product snapshot with an aggregated quantity and
/// the last-selected variant attributes.
///
/// The product is copied at add-time; later catalog changes never alter
/// items already in the cart. The cart holds at most one line per product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product snapshot taken when the item was added.
    pub product: Product,
    /// Aggregated quantity, at least 1.
    pub quantity: u32,
    /// Last selected color, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
    /// Last selected size, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
}

impl CartItem {
    /// Effective unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.effective_price().amount * Decimal::from(self.quantity)
    }
}

/// Snapshot of the derived cart values, published on every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartTotals {
    /// Sum of quantities across all lines.
    pub item_count: u32,
    /// Sum of effective unit price x quantity across all lines.
    pub subtotal: Price,
    /// Coupon percentage applied to the subtotal.
    pub discount: Price,
    /// Shipping cost.
    pub shipping: Price,
    /// `subtotal - discount + shipping`. Not clamped at zero: a coupon
    /// covering the whole subtotal can drive the total negative.
    pub total: Price,
    /// The active coupon, if any.
    pub coupon: Option<AppliedCoupon>,
}

/// Mutable cart state guarded by the store's mutex.
#[derive(Debug, Default)]
struct CartState {
    items: Vec<CartItem>,
    coupon: Option<AppliedCoupon>,
    shipping: Decimal,
}

impl CartState {
    fn totals(&self, currency: CurrencyCode) -> CartTotals {
        let item_count = self.items.iter().map(|item| item.quantity).sum();
        let subtotal: Decimal = self.items.iter().map(CartItem::line_total).sum();
        let percent = self.coupon.as_ref().map_or(0, |c| c.percent_off);
        let discount = subtotal * Decimal::from(percent) / Decimal::ONE_HUNDRED;
        let total = subtotal - discount + self.shipping;

        CartTotals {
            item_count,
            subtotal: Price::new(subtotal, currency),
            discount: Price::new(discount, currency),
            shipping: Price::new(self.shipping, currency),
            total: Price::new(total, currency),
            coupon: self.coupon.clone(),
        }
    }
}

/// The cart store.
///
/// All mutation funnels through the public methods; there is no ambient
/// global state. The store is internally synchronized so it can be shared
/// behind an `Arc`, but the expected usage is a single logical mutator
/// driven serially by UI events.
pub struct CartStore {
    state: Mutex<CartState>,
    storage: Arc<dyn SlotStorage>,
    storage_key: String,
    coupons: CouponBook,
    currency: CurrencyCode,
    totals_tx: watch::Sender<CartTotals>,
}

impl CartStore {
    /// Create a store, restoring the item list from the storage slot.
    ///
    /// A missing or malformed snapshot yields an empty cart; restore never
    /// fails. The coupon and shipping are session state and are not
    /// persisted, so they always start cleared.
    #[must_use]
    pub fn new(
        storage: Arc<dyn SlotStorage>,
        storage_key: impl Into<String>,
        coupons: CouponBook,
        currency: CurrencyCode,
    ) -> Self {
        let storage_key = storage_key.into();
        let items = restore_items(storage.as_ref(), &storage_key);
        let state = CartState {
            items,
            ..CartState::default()
        };
        let (totals_tx, _) = watch::channel(state.totals(currency));

        Self {
            state: Mutex::new(state),
            storage,
            storage_key,
            coupons,
            currency,
            totals_tx,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product to the cart.
    ///
    /// If the product id is already present, its quantity is incremented by
    /// `quantity` and the color/size are overwritten only when a value is
    /// supplied (the previous selection is preserved otherwise). Otherwise a
    /// new line is appended. The caller is responsible for validating the
    /// quantity.
    pub fn add(
        &self,
        product: Product,
        quantity: u32,
        selected_color: Option<String>,
        selected_size: Option<String>,
    ) {
        let mut state = self.lock_state();
        if let Some(item) = state.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity += quantity;
            if selected_color.is_some() {
                item.selected_color = selected_color;
            }
            if selected_size.is_some() {
                item.selected_size = selected_size;
            }
        } else {
            state.items.push(CartItem {
                product,
                quantity,
                selected_color,
                selected_size,
            });
        }
        self.persist_items(&state);
        self.publish(&state);
    }

    /// Add a single unit of a product with no variant selection.
    pub fn add_one(&self, product: Product) {
        self.add(product, 1, None, None);
    }

    /// Remove the line matching `id`. A no-op when the id is not in the cart.
    pub fn remove(&self, id: &ProductId) {
        let mut state = self.lock_state();
        let before = state.items.len();
        state.items.retain(|item| &item.product.id != id);
        if state.items.len() == before {
            return;
        }
        self.persist_items(&state);
        self.publish(&state);
    }

    /// Replace the quantity of the line matching `id`.
    ///
    /// Quantities below 1 are silently rejected so the line never reaches an
    /// invalid state; an unknown id is also a no-op.
    pub fn update_quantity(&self, id: &ProductId, quantity: u32) {
        if quantity < 1 {
            return;
        }
        let mut state = self.lock_state();
        let Some(item) = state.items.iter_mut().find(|i| &i.product.id == id) else {
            return;
        };
        item.quantity = quantity;
        self.persist_items(&state);
        self.publish(&state);
    }

    /// Empty the cart: items, coupon, and shipping reset in one transition.
    pub fn clear(&self) {
        let mut state = self.lock_state();
        state.items.clear();
        state.coupon = None;
        state.shipping = Decimal::ZERO;
        self.persist_items(&state);
        self.publish(&state);
    }

    /// Apply a coupon code (trimmed, case-insensitive).
    ///
    /// Returns `true` and sets the active coupon on a match; returns `false`
    /// with state unchanged otherwise.
    pub fn apply_coupon(&self, code: &str) -> bool {
        let Some(applied) = self.coupons.lookup(code) else {
            debug!(code, "Rejected unknown coupon code");
            return false;
        };
        let mut state = self.lock_state();
        state.coupon = Some(applied);
        self.publish(&state);
        true
    }

    /// Clear the active coupon, independent of items.
    pub fn remove_coupon(&self) {
        let mut state = self.lock_state();
        state.coupon = None;
        self.publish(&state);
    }

    /// Assign the shipping cost. No validation; the shipping calculation
    /// itself is external.
    pub fn set_shipping(&self, value: Decimal) {
        let mut state = self.lock_state();
        state.shipping = value;
        self.publish(&state);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock_state().items.clone()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_state().items.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.totals().item_count
    }

    /// Sum of effective unit price x quantity across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.totals().subtotal
    }

    /// Coupon discount amount (percentage of the subtotal).
    #[must_use]
    pub fn discount(&self) -> Price {
        self.totals().discount
    }

    /// Current shipping cost.
    #[must_use]
    pub fn shipping(&self) -> Price {
        self.totals().shipping
    }

    /// `subtotal - discount + shipping`.
    #[must_use]
    pub fn total(&self) -> Price {
        self.totals().total
    }

    /// The active coupon code, if any.
    #[must_use]
    pub fn coupon_code(&self) -> Option<digital_store_core::CouponCode> {
        self.lock_state().coupon.as_ref().map(|c| c.code.clone())
    }

    /// The active coupon's percent-off, or 0 without a coupon.
    #[must_use]
    pub fn coupon_percent(&self) -> u8 {
        self.lock_state().coupon.as_ref().map_or(0, |c| c.percent_off)
    }

    /// Snapshot of all derived values.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.lock_state().totals(self.currency)
    }

    /// Subscribe to totals snapshots; one is published after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartTotals> {
        self.totals_tx.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist the item list (never the derived fields). Failures are
    /// swallowed: the cart stays usable in-memory.
    fn persist_items(&self, state: &CartState) {
        let payload = match serde_json::to_string(&state.items) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.write_slot(&self.storage_key, &payload) {
            warn!(error = %e, key = %self.storage_key, "Failed to persist cart; continuing in-memory");
        }
    }

    fn publish(&self, state: &CartState) {
        self.totals_tx.send_replace(state.totals(self.currency));
    }
}

/// Restore the persisted item list; invalid or missing payloads yield an
/// empty cart, never an error.
fn restore_items(storage: &dyn SlotStorage, key: &str) -> Vec<CartItem> {
    let Some(payload) = storage.read_slot(key) else {
        debug!(key, "No persisted cart snapshot");
        return Vec::new();
    };
    match serde_json::from_str(&payload) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, key, "Discarding malformed cart snapshot");
            Vec::new()
        }
    }
}
