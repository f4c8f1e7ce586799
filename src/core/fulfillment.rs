//! Fulfillment - Status and payment updates made by the kitchen side.
//!
//! These writes are the only ones allowed to touch an order after placement. Each one is
//! followed by an [`OrderChange`] on the feed so open trackers re-fetch. Delivered and
//! cancelled orders are final.

use crate::{
    core::feed::{OrderChange, OrderFeed},
    entities::{Order, order},
    entities::order::{OrderStatus, PaymentStatus},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

async fn find_order(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })
}

fn announce(feed: &OrderFeed, order: &order::Model) {
    feed.publish(OrderChange {
        order_id: order.id,
        user_id: order.user_id.clone(),
    });
}

/// Moves an order to a new fulfillment status.
///
/// # Errors
/// `OrderNotFound`, `InvalidStatusTransition` if the order is already delivered or
/// cancelled, or a database error.
#[instrument(skip(db, feed))]
pub async fn update_order_status(
    db: &DatabaseConnection,
    feed: &OrderFeed,
    order_id: i64,
    status: OrderStatus,
) -> Result<order::Model> {
    let current = find_order(db, order_id).await?;
    if current.status.is_terminal() {
        return Err(Error::InvalidStatusTransition {
            order_id,
            status: current.status.to_string(),
        });
    }

    let previous = current.status;
    let mut active: order::ActiveModel = current.into();
    active.status = Set(status);
    let updated = active.update(db).await?;

    info!("Order {} moved from {} to {}", order_id, previous, status);
    announce(feed, &updated);
    Ok(updated)
}

/// Records that payment for an order was collected (cash on delivery).
#[instrument(skip(db, feed))]
pub async fn mark_payment_completed(
    db: &DatabaseConnection,
    feed: &OrderFeed,
    order_id: i64,
) -> Result<order::Model> {
    let mut active: order::ActiveModel = find_order(db, order_id).await?.into();
    active.payment_status = Set(PaymentStatus::Completed);
    let updated = active.update(db).await?;

    info!("Payment for order {} marked completed", order_id);
    announce(feed, &updated);
    Ok(updated)
}

/// Sets or clears the estimated delivery time of an order.
#[instrument(skip(db, feed))]
pub async fn set_estimated_delivery(
    db: &DatabaseConnection,
    feed: &OrderFeed,
    order_id: i64,
    eta: Option<DateTimeUtc>,
) -> Result<order::Model> {
    let mut active: order::ActiveModel = find_order(db, order_id).await?.into();
    active.estimated_delivery_time = Set(eta);
    let updated = active.update(db).await?;

    info!("Estimated delivery for order {} set to {:?}", order_id, eta);
    announce(feed, &updated);
    Ok(updated)
}
