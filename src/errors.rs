//! Unified error type for the canteen ordering core.
//!
//! Validation failures abort an operation before any write. Store failures wrap the
//! underlying `DbErr`. `PartialOrder` is kept separate from both so a caller can
//! reconcile an order that was persisted while the follow-up cart clear failed.

use crate::navigation::Route;
use thiserror::Error;

/// All errors surfaced by the library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Any failing call to the store of record
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A required field was empty or otherwise invalid
    #[error("{message}")]
    Validation {
        /// Message shown to the user
        message: String,
    },

    /// The operation needs a signed-in user
    #[error("You must be signed in to do that")]
    NotAuthenticated,

    /// Checkout was attempted with nothing in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart quantities may not go below zero
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    /// Referenced menu item does not exist
    #[error("Menu item not found: {id}")]
    MenuItemNotFound {
        /// Menu item id
        id: i64,
    },

    /// Menu item exists but is not currently offered
    #[error("'{name}' is currently unavailable")]
    MenuItemUnavailable {
        /// Display name of the item
        name: String,
    },

    /// Referenced order does not exist
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Order id
        id: i64,
    },

    /// A placement for this checkout form is already running
    #[error("An order is already being placed")]
    OrderInProgress,

    /// The order was persisted but a follow-up step failed
    #[error("Order #{order_id} was placed but {message}")]
    PartialOrder {
        /// Id of the persisted order
        order_id: i64,
        /// What went wrong after the order was written
        message: String,
    },

    /// Fulfillment tried to move an order out of a final status
    #[error("Order #{order_id} is already {status} and cannot change")]
    InvalidStatusTransition {
        /// Order id
        order_id: i64,
        /// Current (terminal) status label
        status: String,
    },
}

impl Error {
    /// Where the caller should be sent after this error, if anywhere.
    #[must_use]
    pub const fn redirect(&self) -> Option<Route> {
        match self {
            Self::EmptyCart => Some(Route::Menu),
            Self::NotAuthenticated => Some(Route::Auth),
            Self::PartialOrder { .. } => Some(Route::Orders),
            _ => None,
        }
    }

    /// True for failures raised before any write was attempted.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::EmptyCart
                | Self::InvalidQuantity { .. }
                | Self::NotAuthenticated
                | Self::OrderInProgress
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
