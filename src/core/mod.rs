//! Core business logic - Framework-agnostic canteen operations.
//!
//! Each submodule is one component of the ordering flow. Data moves menu catalog →
//! cart → checkout → tracker; fulfillment and the feed sit on the trusted side.

/// Cart lines, totals and the stateful cart view
pub mod cart;
/// Menu listing, filtering and seeding
pub mod catalog;
/// Order placement
pub mod checkout;
/// Push channel for order changes
pub mod feed;
/// Kitchen-side status and payment updates
pub mod fulfillment;
/// Order history with live updates
pub mod tracker;
