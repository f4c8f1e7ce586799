//! `CanteenConnect` - Ordering core for a campus canteen
//!
//! This crate provides the business logic behind a canteen ordering front end: menu
//! browsing, per-user carts, checkout into priced orders, and a live order status view.
//! It also hosts the small, independent assignment builder used by the 3D homework
//! creator, which shares nothing with the canteen modules.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Style consistency
    clippy::enum_glob_use,
    clippy::semicolon_if_nothing_returned,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// In-memory assignment builder for the homework creator
pub mod assignments;
/// Configuration management for database and menu seeding
pub mod config;
/// Core business logic - catalog, cart, checkout, tracking and fulfillment
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Success and failure notices for user actions
pub mod feedback;
/// Navigation targets
pub mod navigation;
/// Signed-in user context
pub mod session;

#[cfg(test)]
pub mod test_utils;
