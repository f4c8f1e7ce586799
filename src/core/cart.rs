//! Cart business logic - Per-user (menu item, quantity) lines.
//!
//! A user has at most one line per menu item; the store enforces that with a unique
//! index and every write goes through its native upsert. Quantity zero means "no line".
//! Totals are never stored: [`Cart::total`] and [`Cart::item_count`] recompute from the
//! lines each time they are called.
//!
//! [`CartStore`] is the stateful view used by the menu and cart sheet. Every mutation is
//! followed by a full re-fetch, and the held snapshot is only replaced when both the write
//! and the re-fetch succeed.

use crate::{
    core::catalog,
    entities::{CartItem, MenuItem, cart_item},
    errors::{Error, Result},
    session::Session,
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::OnConflict};
use tracing::{debug, info, instrument, warn};

/// One cart line joined with the current menu data
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Id of the underlying cart row
    pub cart_item_id: i64,
    /// Menu item in the cart
    pub menu_item_id: i64,
    /// Current menu name
    pub name: String,
    /// Current menu price per unit
    pub unit_price: f64,
    /// Current menu picture
    pub image_url: Option<String>,
    /// Units in the cart
    pub quantity: i32,
}

impl CartLine {
    /// `unit_price * quantity`
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// A user's cart as last read from the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    /// Lines in no guaranteed order
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Sum of `unit_price * quantity` over the current lines
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over the current lines
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    /// True when there are no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for a menu item, if present
    #[must_use]
    pub fn line(&self, menu_item_id: i64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.menu_item_id == menu_item_id)
    }

    /// "1 item" / "3 items", as shown in the cart sheet header
    #[must_use]
    pub fn count_label(&self) -> String {
        let count = self.item_count();
        if count == 1 {
            "1 item".to_string()
        } else {
            format!("{count} items")
        }
    }
}

/// Reads every cart line for `user_id`, joined with the current menu name and price.
#[instrument(skip(db))]
pub async fn list_cart<C>(db: &C, user_id: &str) -> Result<Cart>
where
    C: ConnectionTrait,
{
    let rows = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .order_by_asc(cart_item::Column::Id)
        .find_also_related(MenuItem)
        .all(db)
        .await?;

    let mut lines = Vec::with_capacity(rows.len());
    for (row, item) in rows {
        let Some(item) = item else {
            warn!(
                "Cart line {} points at missing menu item {}",
                row.id, row.menu_item_id
            );
            continue;
        };
        lines.push(CartLine {
            cart_item_id: row.id,
            menu_item_id: row.menu_item_id,
            name: item.name,
            unit_price: item.price,
            image_url: item.image_url,
            quantity: row.quantity,
        });
    }
    debug!("Fetched {} cart lines for user {}", lines.len(), user_id);
    Ok(Cart { lines })
}

/// Puts a menu item in the cart with quantity 1.
///
/// If the user already has a line for the item the store keeps it as it is, so repeated
/// adds are idempotent. Quantity changes go through [`set_quantity`].
///
/// # Errors
/// Returns `MenuItemNotFound` or `MenuItemUnavailable` before writing anything, or a
/// database error if the upsert fails.
#[instrument(skip(db))]
pub async fn add_item<C>(db: &C, user_id: &str, menu_item_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let item = catalog::get_menu_item(db, menu_item_id)
        .await?
        .ok_or(Error::MenuItemNotFound { id: menu_item_id })?;
    if !item.is_available {
        return Err(Error::MenuItemUnavailable { name: item.name });
    }

    let line = cart_item::ActiveModel {
        user_id: Set(user_id.to_string()),
        menu_item_id: Set(menu_item_id),
        quantity: Set(1),
        ..Default::default()
    };
    let inserted = CartItem::insert(line)
        .on_conflict(
            OnConflict::columns([cart_item::Column::UserId, cart_item::Column::MenuItemId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    if inserted == 0 {
        debug!("'{}' already in cart for user {}", item.name, user_id);
    } else {
        info!("Added '{}' to cart for user {}", item.name, user_id);
    }
    Ok(())
}

/// Overwrites the quantity of a cart line; zero removes the line.
///
/// A positive quantity is written with an upsert on `(user_id, menu_item_id)`, so the last
/// writer wins when two devices edit the same cart.
///
/// # Errors
/// Returns `InvalidQuantity` for negative values, or a database error.
#[instrument(skip(db))]
pub async fn set_quantity<C>(db: &C, user_id: &str, menu_item_id: i64, quantity: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    if quantity == 0 {
        remove_item(db, user_id, menu_item_id).await?;
        return Ok(());
    }

    let line = cart_item::ActiveModel {
        user_id: Set(user_id.to_string()),
        menu_item_id: Set(menu_item_id),
        quantity: Set(quantity),
        ..Default::default()
    };
    CartItem::insert(line)
        .on_conflict(
            OnConflict::columns([cart_item::Column::UserId, cart_item::Column::MenuItemId])
                .update_column(cart_item::Column::Quantity)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    info!(
        "Set quantity of menu item {} to {} for user {}",
        menu_item_id, quantity, user_id
    );
    Ok(())
}

/// Deletes the cart line for a menu item. Returns the number of rows removed (0 or 1).
#[instrument(skip(db))]
pub async fn remove_item<C>(db: &C, user_id: &str, menu_item_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::MenuItemId.eq(menu_item_id))
        .exec(db)
        .await?;
    debug!(
        "Removed menu item {} from cart of user {}, rows affected: {}",
        menu_item_id, user_id, result.rows_affected
    );
    Ok(result.rows_affected)
}

/// Deletes every cart line for a user. Returns the number of rows removed.
#[instrument(skip(db))]
pub async fn clear_cart<C>(db: &C, user_id: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    info!(
        "Cleared {} cart lines for user {}",
        result.rows_affected, user_id
    );
    Ok(result.rows_affected)
}

/// Deletes the given cart rows of a user, leaving any other lines in place.
/// Returns the number of rows removed.
#[instrument(skip(db, cart_item_ids))]
pub async fn clear_lines<C>(db: &C, user_id: &str, cart_item_ids: &[i64]) -> Result<u64>
where
    C: ConnectionTrait,
{
    if cart_item_ids.is_empty() {
        return Ok(0);
    }
    let result = CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::Id.is_in(cart_item_ids.iter().copied()))
        .exec(db)
        .await?;
    info!(
        "Cleared {} of {} cart lines for user {}",
        result.rows_affected,
        cart_item_ids.len(),
        user_id
    );
    Ok(result.rows_affected)
}

/// The signed-in user's cart, kept in step with the store.
#[derive(Debug)]
pub struct CartStore {
    db: DatabaseConnection,
    user_id: String,
    cart: Cart,
}

impl CartStore {
    /// Loads the cart for the session's user.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` without a signed-in user, or a database error.
    pub async fn open(db: DatabaseConnection, session: &Session) -> Result<Self> {
        let user_id = session.require_user()?.id.clone();
        let cart = list_cart(&db, &user_id).await?;
        Ok(Self { db, user_id, cart })
    }

    /// Owner of this cart
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The last successfully fetched cart
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Re-reads the cart from the store.
    pub async fn refresh(&mut self) -> Result<&Cart> {
        self.cart = list_cart(&self.db, &self.user_id).await?;
        Ok(&self.cart)
    }

    /// See [`add_item`]
    pub async fn add_item(&mut self, menu_item_id: i64) -> Result<&Cart> {
        add_item(&self.db, &self.user_id, menu_item_id).await?;
        self.refresh().await
    }

    /// See [`set_quantity`]
    pub async fn set_quantity(&mut self, menu_item_id: i64, quantity: i32) -> Result<&Cart> {
        set_quantity(&self.db, &self.user_id, menu_item_id, quantity).await?;
        self.refresh().await
    }

    /// See [`remove_item`]
    pub async fn remove_item(&mut self, menu_item_id: i64) -> Result<&Cart> {
        remove_item(&self.db, &self.user_id, menu_item_id).await?;
        self.refresh().await
    }

    /// Steps a line's quantity down by one, clamped at zero (which removes it).
    pub async fn decrement(&mut self, menu_item_id: i64) -> Result<&Cart> {
        let current = self.cart.line(menu_item_id).map_or(0, |l| l.quantity);
        self.set_quantity(menu_item_id, (current - 1).max(0)).await
    }

    /// Steps a line's quantity up by one.
    pub async fn increment(&mut self, menu_item_id: i64) -> Result<&Cart> {
        let current = self.cart.line(menu_item_id).map_or(0, |l| l.quantity);
        self.set_quantity(menu_item_id, current.saturating_add(1)).await
    }
}
