//! Order status tracking - The signed-in user's order history, kept live by the feed.
//!
//! The tracker never patches rows from events. Any event for the user, including a
//! "missed events" notice, triggers a full re-fetch, so duplicated or reordered
//! deliveries leave it in the same state. It never writes status fields; those belong
//! to [`crate::core::fulfillment`].

use crate::{
    core::feed::{FeedEvent, OrderFeed, Subscription},
    entities::{Order, order},
    entities::order::{OrderStatus, PaymentStatus},
    errors::Result,
    session::Session,
};
use sea_orm::{QueryOrder, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Lists every order of a user, newest first.
#[instrument(skip(db))]
pub async fn list_orders<C>(db: &C, user_id: &str) -> Result<Vec<order::Model>>
where
    C: ConnectionTrait,
{
    let orders = Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    debug!("Fetched {} orders for user {}", orders.len(), user_id);
    Ok(orders)
}

/// Icon shown next to an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    /// Check mark, delivered
    Delivered,
    /// Truck, on the way
    OutForDelivery,
    /// Clock, everything else
    InProgress,
}

/// Badge style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    /// Primary style
    Default,
    /// Muted style
    Secondary,
    /// Warning style
    Destructive,
}

/// How one order is rendered in the status list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDisplay {
    /// Short reference, e.g. `Order #42`
    pub reference: String,
    /// Status icon
    pub icon: StatusIcon,
    /// Status label, e.g. `OUT FOR DELIVERY`
    pub status_label: String,
    /// Status badge style
    pub status_tone: BadgeTone,
    /// Amount with currency, two decimals
    pub amount: String,
    /// Placement time, e.g. `Mar 05, 2025 01:30 PM`
    pub placed_at: String,
    /// Payment label, e.g. `COMPLETED`
    pub payment_label: String,
    /// Payment badge style
    pub payment_tone: BadgeTone,
}

/// Icon for a status
#[must_use]
pub const fn status_icon(status: OrderStatus) -> StatusIcon {
    match status {
        OrderStatus::Delivered => StatusIcon::Delivered,
        OrderStatus::OutForDelivery => StatusIcon::OutForDelivery,
        _ => StatusIcon::InProgress,
    }
}

/// Badge style for a status
#[must_use]
pub const fn status_tone(status: OrderStatus) -> BadgeTone {
    match status {
        OrderStatus::Pending => BadgeTone::Secondary,
        OrderStatus::Cancelled => BadgeTone::Destructive,
        _ => BadgeTone::Default,
    }
}

/// Upper-cased status with underscores as spaces
#[must_use]
pub fn status_label(status: OrderStatus) -> String {
    status.as_str().replace('_', " ").to_uppercase()
}

/// Badge style for a payment status: only completed payments get the primary style
#[must_use]
pub const fn payment_tone(status: PaymentStatus) -> BadgeTone {
    match status {
        PaymentStatus::Completed => BadgeTone::Default,
        PaymentStatus::Pending => BadgeTone::Secondary,
    }
}

impl From<&order::Model> for OrderDisplay {
    fn from(order: &order::Model) -> Self {
        Self {
            reference: format!("Order #{}", order.id),
            icon: status_icon(order.status),
            status_label: status_label(order.status),
            status_tone: status_tone(order.status),
            amount: format!("₹{:.2}", order.total_amount),
            placed_at: order.created_at.format("%b %d, %Y %I:%M %p").to_string(),
            payment_label: order.payment_status.as_str().to_uppercase(),
            payment_tone: payment_tone(order.payment_status),
        }
    }
}

/// Live order list for the signed-in user.
///
/// Holds a feed subscription for as long as it exists; [`OrderTracker::close`] (or drop)
/// releases it.
#[derive(Debug)]
pub struct OrderTracker {
    db: DatabaseConnection,
    user_id: String,
    orders: Vec<order::Model>,
    subscription: Subscription,
}

impl OrderTracker {
    /// Subscribes to the user's order changes and loads the current list.
    ///
    /// The subscription is opened before the first fetch so no change between the two
    /// can be lost.
    ///
    /// # Errors
    /// `NotAuthenticated` without a signed-in user, or a database error. No subscription
    /// is left behind on error.
    pub async fn open(db: DatabaseConnection, feed: &OrderFeed, session: &Session) -> Result<Self> {
        let user_id = session.require_user()?.id.clone();
        let subscription = feed.subscribe(user_id.as_str());
        let orders = list_orders(&db, &user_id).await?;
        info!(
            "Order tracker opened for user {} with {} orders",
            user_id,
            orders.len()
        );
        Ok(Self {
            db,
            user_id,
            orders,
            subscription,
        })
    }

    /// Orders as last fetched, newest first
    #[must_use]
    pub fn orders(&self) -> &[order::Model] {
        &self.orders
    }

    /// Display rows for the current orders
    #[must_use]
    pub fn display(&self) -> Vec<OrderDisplay> {
        self.orders.iter().map(OrderDisplay::from).collect()
    }

    /// Re-reads the full order list. On error the previous list is kept.
    pub async fn refresh(&mut self) -> Result<&[order::Model]> {
        self.orders = list_orders(&self.db, &self.user_id).await?;
        Ok(&self.orders)
    }

    /// Waits for the next change to one of the user's orders and re-fetches.
    ///
    /// Returns `Ok(false)` once the feed has shut down.
    ///
    /// # Errors
    /// A database error from the re-fetch; the previous list is kept and the tracker
    /// stays subscribed.
    pub async fn next_update(&mut self) -> Result<bool> {
        match self.subscription.next().await {
            Some(FeedEvent::OrderUpdated { order_id }) => {
                debug!("Order {} changed, refreshing", order_id);
            }
            Some(FeedEvent::Missed { count }) => {
                warn!("Missed {} order events, refreshing", count);
            }
            None => {
                debug!("Order feed closed for user {}", self.user_id);
                return Ok(false);
            }
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Releases the feed subscription.
    pub fn close(self) {
        info!("Order tracker closed for user {}", self.user_id);
        self.subscription.unsubscribe();
    }
}
