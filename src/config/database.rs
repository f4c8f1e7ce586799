//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The one constraint the entities cannot
//! express, the unique `(user_id, menu_item_id)` pair on `cart_items`, is added here as an
//! index because cart upserts rely on it.

use crate::config::env_or;
use crate::entities::{CartItem, Category, MenuItem, Order, OrderItem, cart_item};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Default database location when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/canteen.sqlite?mode=rwc";

/// Name of the unique index backing cart upserts
pub const CART_LINE_INDEX: &str = "idx_cart_items_user_menu_item";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// # Errors
/// Returns `Error::EnvVar` if `DATABASE_URL` is set but not valid unicode.
pub fn get_database_url() -> Result<String> {
    env_or("DATABASE_URL", DEFAULT_DATABASE_URL)
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;
    info!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables (if missing) plus the cart uniqueness index.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents before children so foreign keys resolve
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, MenuItem).await?;
    create_table(db, &schema, CartItem).await?;
    create_table(db, &schema, Order).await?;
    create_table(db, &schema, OrderItem).await?;

    let cart_index = Index::create()
        .name(CART_LINE_INDEX)
        .table(CartItem)
        .col(cart_item::Column::UserId)
        .col(cart_item::Column::MenuItemId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&cart_index)).await?;

    debug!("Schema ready");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CartItemModel, CategoryModel, MenuItemModel, OrderItemModel, OrderModel};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<MenuItemModel> = MenuItem::find().limit(1).all(&db).await?;
        let _: Vec<CartItemModel> = CartItem::find().limit(1).all(&db).await?;
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        let _: Vec<OrderItemModel> = OrderItem::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_cart_index_rejects_duplicate_lines() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        db.execute_unprepared(
            "INSERT INTO menu_items (name, description, price, is_veg, is_available) \
             VALUES ('Tea', '', 10.0, 1, 1)",
        )
        .await?;
        db.execute_unprepared(
            "INSERT INTO cart_items (user_id, menu_item_id, quantity) VALUES ('u1', 1, 1)",
        )
        .await?;
        let duplicate = db
            .execute_unprepared(
                "INSERT INTO cart_items (user_id, menu_item_id, quantity) VALUES ('u1', 1, 2)",
            )
            .await;
        assert!(duplicate.is_err());
        Ok(())
    }
}
