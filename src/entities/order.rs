//! Order entity - A finalized, priced order plus payment and fulfillment metadata.
//!
//! Everything except `status`, `payment_status` and `estimated_delivery_time` is fixed
//! once the row is written. Those three are only changed by the fulfillment side.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer chose to pay. Recorded only; nothing is charged.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// UPI transfer
    #[default]
    #[sea_orm(string_value = "upi")]
    Upi,
    /// Debit or credit card
    #[sea_orm(string_value = "card")]
    Card,
    /// Prepaid wallet
    #[sea_orm(string_value = "wallet")]
    Wallet,
    /// Cash on delivery
    #[sea_orm(string_value = "cash")]
    Cash,
}

impl PaymentMethod {
    /// Payment status an order starts with for this method.
    ///
    /// Cash is collected on delivery, so it starts pending; every other method is
    /// treated as settled at checkout.
    #[must_use]
    pub const fn initial_payment_status(self) -> PaymentStatus {
        match self {
            Self::Cash => PaymentStatus::Pending,
            Self::Upi | Self::Card | Self::Wallet => PaymentStatus::Completed,
        }
    }

    /// Stored value of the method
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::Card => "card",
            Self::Wallet => "wallet",
            Self::Cash => "cash",
        }
    }

    /// Label shown on the checkout form
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::Card => "Card",
            Self::Wallet => "Wallet",
            Self::Cash => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether payment has been collected
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not yet collected
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Collected
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl PaymentStatus {
    /// Stored value of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfillment status of an order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, not yet seen by the kitchen
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Accepted by the kitchen
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Being cooked
    #[sea_orm(string_value = "preparing")]
    Preparing,
    /// Ready for pickup or dispatch
    #[sea_orm(string_value = "ready")]
    Ready,
    /// On its way
    #[sea_orm(string_value = "out_for_delivery")]
    OutForDelivery,
    /// Handed over
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Will not be fulfilled
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Stored value of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Delivered and cancelled orders never change status again
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who placed the order
    pub user_id: String,
    /// Sum of the line snapshots at placement time
    pub total_amount: f64,
    /// Chosen payment method
    pub payment_method: PaymentMethod,
    /// Payment collection state
    pub payment_status: PaymentStatus,
    /// Fulfillment state
    pub status: OrderStatus,
    /// Free-text note for the kitchen
    pub special_instructions: Option<String>,
    /// When the order was placed
    pub created_at: DateTimeUtc,
    /// Set by the kitchen once known
    pub estimated_delivery_time: Option<DateTimeUtc>,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many line items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_cash_starts_pending_other_methods_completed() {
        assert_eq!(
            PaymentMethod::Cash.initial_payment_status(),
            PaymentStatus::Pending
        );
        for method in [PaymentMethod::Upi, PaymentMethod::Card, PaymentMethod::Wallet] {
            assert_eq!(method.initial_payment_status(), PaymentStatus::Completed);
        }
    }

    #[test]
    fn test_stored_values_match_active_enum() {
        for status in OrderStatus::iter() {
            assert_eq!(status.to_value(), status.as_str());
        }
        for method in PaymentMethod::iter() {
            assert_eq!(method.to_value(), method.as_str());
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::OutForDelivery.is_terminal());
    }
}
