//! Order change feed - The push channel behind the order status view.
//!
//! Every write the fulfillment side makes to an order is published as an [`OrderChange`].
//! Listeners subscribe for one user and only see that user's orders. Events carry no data
//! a listener is expected to trust; they only say "re-fetch".
//!
//! A [`Subscription`] owns its receiver, so dropping it releases the listener. Views call
//! [`Subscription::unsubscribe`] on teardown to make the release explicit in logs.

use crate::{
    config::env_or,
    errors::{Error, Result},
};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default number of buffered events per listener
pub const DEFAULT_FEED_CAPACITY: usize = 64;

/// An order row owned by `user_id` was updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderChange {
    /// Updated order
    pub order_id: i64,
    /// Owner of the order
    pub user_id: String,
}

/// What a subscriber receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// One of the subscriber's orders changed
    OrderUpdated {
        /// Updated order
        order_id: i64,
    },
    /// The subscriber fell behind and events were dropped
    Missed {
        /// Number of dropped events, across all users
        count: u64,
    },
}

/// Publisher side of the feed
#[derive(Debug, Clone)]
pub struct OrderFeed {
    tx: broadcast::Sender<OrderChange>,
}

impl Default for OrderFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl OrderFeed {
    /// Creates a feed buffering up to `capacity` events per listener (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Reads `ORDER_FEED_CAPACITY`, falling back to [`DEFAULT_FEED_CAPACITY`].
    ///
    /// # Errors
    /// Returns `Error::Config` if the variable is set but not a positive integer.
    pub fn from_env() -> Result<Self> {
        let raw = env_or("ORDER_FEED_CAPACITY", &DEFAULT_FEED_CAPACITY.to_string())?;
        Ok(Self::new(parse_capacity(&raw)?))
    }

    /// Announces that an order changed. Having no listeners is not an error.
    pub fn publish(&self, change: OrderChange) {
        debug!(
            "Publishing change for order {} of user {}",
            change.order_id, change.user_id
        );
        if self.tx.send(change).is_err() {
            debug!("No listeners for order change");
        }
    }

    /// Opens a subscription scoped to one user's orders.
    #[must_use]
    pub fn subscribe(&self, user_id: impl Into<String>) -> Subscription {
        let user_id = user_id.into();
        debug!("Opening order feed subscription for user {}", user_id);
        Subscription {
            user_id,
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live, user-scoped listener on an [`OrderFeed`]
#[derive(Debug)]
pub struct Subscription {
    user_id: String,
    rx: broadcast::Receiver<OrderChange>,
}

impl Subscription {
    /// User this subscription is scoped to
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Waits for the next event for this user.
    ///
    /// Returns `None` once every publisher is gone.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        loop {
            match self.rx.recv().await {
                Ok(change) if change.user_id == self.user_id => {
                    return Some(FeedEvent::OrderUpdated {
                        order_id: change.order_id,
                    });
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(
                        "Order feed subscriber for user {} missed {} events",
                        self.user_id, count
                    );
                    return Some(FeedEvent::Missed { count });
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Releases the listener.
    pub fn unsubscribe(self) {
        debug!("Closing order feed subscription for user {}", self.user_id);
    }
}

fn parse_capacity(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(Error::Config {
            message: format!("ORDER_FEED_CAPACITY must be a positive integer, got '{raw}'"),
        }),
    }
}
