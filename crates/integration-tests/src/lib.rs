//! Integration tests for Digital Store.
//!
//! Everything runs in-process against the in-memory catalog and storage
//! doubles - no external services.
//!
//! # Test Categories
//!
//! - `cart_checkout_flow` - full add -> coupon -> shipping -> clear cycle
//!   with persistence round-trips
//! - `catalog_listing` - catalog fetches through the listing pipeline,
//!   including the stale-response guard and the outage path
