//! Digital Store Storefront library.
//!
//! This crate owns the two pieces of the storefront that carry real business
//! rules:
//!
//! - the [`cart`] store: line items, coupons, shipping, and the derived
//!   monetary totals, persisted best-effort to a key-value storage slot;
//! - the [`listing`] pipeline: a pure filter/sort over the product catalog.
//!
//! Products come from a [`catalog`] collaborator (an async repository the
//! core treats as read-only) and cart snapshots go through the [`storage`]
//! collaborator. [`state::StoreState`] wires everything together and is the
//! single object injected into the UI tree root - there is no ambient global
//! state, and no particular UI binding is assumed: observers subscribe to
//! cart changes through a watch channel.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod listing;
pub mod state;
pub mod storage;
