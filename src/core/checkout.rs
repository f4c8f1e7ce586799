//! Order placement - Turns the signed-in user's cart into a persisted order.
//!
//! The flow reads the cart with current menu prices, writes the order and one line per
//! cart line inside a single transaction, and only then clears the cart. Readers therefore
//! never see an order without its lines, and never see a cleared cart without the order
//! that replaced it. Only the cart rows that went into the order are cleared; a line
//! added elsewhere while the order was being written stays in the cart.
//!
//! Failure handling follows the order of the writes:
//! - empty cart, missing session or a placement already running: nothing is written
//! - order or line insert fails: the transaction rolls back and the cart is untouched
//! - cart clear fails after commit: the order stands and `Error::PartialOrder` carries its
//!   id so someone can reconcile the leftover cart
//!
//! Totals and the initial payment status are computed here on the client side. Nothing
//! de-duplicates rapid repeat submissions beyond the per-form guard in [`Checkout`].

use crate::{
    core::cart,
    entities::{
        Order, OrderItem, PaymentMethod, order,
        order::OrderStatus,
        order_item,
    },
    errors::{Error, Result},
    navigation::Route,
    session::Session,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, instrument, warn};

/// A successfully placed order
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    /// The persisted order row
    pub order: order::Model,
    /// Its line snapshots
    pub lines: Vec<order_item::Model>,
    /// Where the caller goes next
    pub route: Route,
}

/// Places an order for everything in the session user's cart.
///
/// # Errors
/// - `NotAuthenticated` without a signed-in user
/// - `EmptyCart` if the cart has no lines (its redirect is the menu)
/// - `Database` if reading the cart or writing the order fails; the cart is untouched
/// - `PartialOrder` if the order was written but the cart could not be cleared
#[instrument(skip(db, session, special_instructions))]
pub async fn place_order(
    db: &DatabaseConnection,
    session: &Session,
    payment_method: PaymentMethod,
    special_instructions: Option<&str>,
) -> Result<PlacedOrder> {
    let user_id = session.require_user()?.id.as_str();

    let current_cart = cart::list_cart(db, user_id).await?;
    if current_cart.is_empty() {
        warn!("User {} tried to check out with an empty cart", user_id);
        return Err(Error::EmptyCart);
    }

    let total = current_cart.total();
    let instructions = special_instructions
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);

    let txn = db.begin().await?;

    let order = order::ActiveModel {
        user_id: Set(user_id.to_string()),
        total_amount: Set(total),
        payment_method: Set(payment_method),
        payment_status: Set(payment_method.initial_payment_status()),
        status: Set(OrderStatus::Pending),
        special_instructions: Set(instructions),
        created_at: Set(chrono::Utc::now()),
        estimated_delivery_time: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let line_models = current_cart.lines.iter().map(|line| order_item::ActiveModel {
        order_id: Set(order.id),
        menu_item_id: Set(line.menu_item_id),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
        ..Default::default()
    });
    OrderItem::insert_many(line_models).exec(&txn).await?;
    let lines = order_lines(&txn, order.id).await?;

    txn.commit().await?;
    info!(
        "Placed order {} for user {}: {} lines, total {:.2}, paid by {}",
        order.id,
        user_id,
        lines.len(),
        order.total_amount,
        order.payment_method
    );

    let placed_lines: Vec<i64> = current_cart.lines.iter().map(|l| l.cart_item_id).collect();
    if let Err(e) = cart::clear_lines(db, user_id, &placed_lines).await {
        error!(
            "Order {} was placed but the cart of user {} could not be cleared: {}",
            order.id, user_id, e
        );
        return Err(Error::PartialOrder {
            order_id: order.id,
            message: format!("the cart could not be cleared: {e}"),
        });
    }

    Ok(PlacedOrder {
        order,
        lines,
        route: Route::Orders,
    })
}

/// Line snapshots of an order, in insertion order.
pub async fn order_lines<C>(db: &C, order_id: i64) -> Result<Vec<order_item::Model>>
where
    C: ConnectionTrait,
{
    OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an order by id.
pub async fn get_order<C>(db: &C, order_id: i64) -> Result<Option<order::Model>>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// The checkout form: payment choice, kitchen note, and the "Place Order" button state.
#[derive(Debug, Default)]
pub struct Checkout {
    /// Selected payment method, UPI unless changed
    pub payment_method: PaymentMethod,
    /// Optional note for the kitchen; blank means none
    pub special_instructions: String,
    submitting: AtomicBool,
}

impl Checkout {
    /// A form with the given payment method and no note
    #[must_use]
    pub fn new(payment_method: PaymentMethod) -> Self {
        Self {
            payment_method,
            ..Self::default()
        }
    }

    /// True while a placement from this form is in flight
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Places the order described by this form.
    ///
    /// # Errors
    /// `OrderInProgress` if this form is already placing an order, otherwise as
    /// [`place_order`].
    pub async fn place_order(
        &self,
        db: &DatabaseConnection,
        session: &Session,
    ) -> Result<PlacedOrder> {
        let _guard = SubmitGuard::acquire(&self.submitting).ok_or(Error::OrderInProgress)?;
        place_order(
            db,
            session,
            self.payment_method,
            Some(self.special_instructions.as_str()),
        )
        .await
    }
}

/// Holds the form's in-flight flag; clears it when dropped.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
