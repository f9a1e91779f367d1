//! End-to-end cart flow: browse the fixture catalog, fill the cart, apply a
//! coupon, assign shipping, and verify the derived totals and the persisted
//! snapshot at every step.

use std::sync::Arc;

use rust_decimal::dec;

use digital_store_core::ProductId;
use digital_store_storefront::cart::CartItem;
use digital_store_storefront::config::StoreConfig;
use digital_store_storefront::state::StoreState;
use digital_store_storefront::storage::{MemoryStorage, SlotStorage};

fn fresh_state(storage: Arc<MemoryStorage>) -> StoreState {
    StoreState::with_fixture_catalog(StoreConfig::default(), storage)
}

#[tokio::test]
async fn test_full_checkout_flow() {
    let storage = Arc::new(MemoryStorage::new());
    let state = fresh_state(Arc::clone(&storage));

    // Browse: pick two products off the catalog
    let revolution = state
        .load_product(&ProductId::new("1"))
        .await
        .expect("fixture product 1");
    let ultraboost = state
        .load_product(&ProductId::new("3"))
        .await
        .expect("fixture product 3");

    let cart = state.cart();
    cart.add(revolution, 2, Some("Azul".to_owned()), Some("42".to_owned()));
    cart.add_one(ultraboost);

    // Product 1 is discounted 299.90 -> 219.90; product 3 has no discount
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.subtotal().amount, dec!(219.9) * dec!(2) + dec!(599.9));

    // Coupon: 20% off the subtotal
    assert!(cart.apply_coupon("PROMO20"));
    let subtotal = cart.subtotal().amount;
    assert_eq!(cart.discount().amount, subtotal * dec!(0.20));

    // Simulated shipping
    cart.set_shipping(dec!(19.9));
    assert_eq!(
        cart.total().amount,
        subtotal - subtotal * dec!(0.20) + dec!(19.9)
    );

    // The persisted snapshot holds the item list, not the derived fields,
    // under the configured slot key
    let payload = storage
        .read_slot(&state.config().cart_storage_key)
        .expect("snapshot written");
    let items: Vec<CartItem> = serde_json::from_str(&payload).expect("well-formed snapshot");
    assert_eq!(items.len(), 2);

    // Checkout done: one atomic reset
    cart.clear();
    let totals = cart.totals();
    assert_eq!(totals.item_count, 0);
    assert_eq!(totals.coupon, None);
    assert_eq!(totals.shipping.amount, dec!(0));
    assert_eq!(totals.total.amount, dec!(0));

    let payload = storage
        .read_slot("digital-store-cart")
        .expect("snapshot written");
    assert_eq!(payload, "[]");
}

#[tokio::test]
async fn test_cart_survives_restart_via_snapshot() {
    let storage = Arc::new(MemoryStorage::new());

    {
        let state = fresh_state(Arc::clone(&storage));
        let product = state
            .load_product(&ProductId::new("4"))
            .await
            .expect("fixture product 4");
        state.cart().add(product, 2, None, Some("40".to_owned()));
        assert!(state.cart().apply_coupon("OFF30"));
        state.cart().set_shipping(dec!(9.9));
    }

    // A new session restores the items; coupon and shipping are session
    // state and start cleared
    let state = fresh_state(storage);
    let cart = state.cart();
    let items = cart.items();
    assert_eq!(items.len(), 1);
    let item = items.first().expect("one line");
    assert_eq!(item.product.id.as_str(), "4");
    assert_eq!(item.quantity, 2);
    assert_eq!(item.selected_size.as_deref(), Some("40"));

    assert_eq!(cart.coupon_percent(), 0);
    assert_eq!(cart.shipping().amount, dec!(0));
    // Product 4 is discounted 349.90 -> 279.90
    assert_eq!(cart.total().amount, dec!(279.9) * dec!(2));
}

#[tokio::test]
async fn test_snapshot_roundtrip_is_elementwise_equal() {
    let storage = Arc::new(MemoryStorage::new());
    let state = fresh_state(Arc::clone(&storage));

    for id in ["2", "5", "8"] {
        let product = state
            .load_product(&ProductId::new(id))
            .await
            .expect("fixture product");
        state.cart().add_one(product);
    }
    let original = state.cart().items();

    let restored_state = fresh_state(storage);
    assert_eq!(restored_state.cart().items(), original);
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty_and_recovers() {
    let storage = Arc::new(MemoryStorage::with_slot(
        "digital-store-cart",
        "{\"definitely\":\"not a cart\"}",
    ));
    let state = fresh_state(Arc::clone(&storage));
    assert!(state.cart().is_empty());

    // The next mutation overwrites the corrupt slot with a valid snapshot
    let product = state
        .load_product(&ProductId::new("6"))
        .await
        .expect("fixture product 6");
    state.cart().add_one(product);

    let payload = storage.read_slot("digital-store-cart").expect("snapshot");
    let items: Vec<CartItem> = serde_json::from_str(&payload).expect("valid again");
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_totals_subscription_follows_the_flow() {
    let storage = Arc::new(MemoryStorage::new());
    let state = fresh_state(storage);
    let rx = state.cart().subscribe();

    let product = state
        .load_product(&ProductId::new("3"))
        .await
        .expect("fixture product 3");
    state.cart().add(product, 2, None, None);
    assert_eq!(rx.borrow().subtotal.amount, dec!(599.9) * dec!(2));

    assert!(state.cart().apply_coupon("desconto10"));
    assert_eq!(rx.borrow().discount.amount, dec!(1199.8) * dec!(0.10));

    state.cart().clear();
    assert_eq!(rx.borrow().item_count, 0);
}
