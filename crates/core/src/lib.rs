//! Digital Store Core - Shared types library.
//!
//! This crate provides common types used across all Digital Store components:
//! - `storefront` - Cart store, catalog access, and listing pipeline
//! - `integration-tests` - Cross-crate flow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices, plus the
//!   validated [`types::Product`] record
//!
//! [`types::Product`]: types::product::Product

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
