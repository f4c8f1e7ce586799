//! Shared test utilities for the canteen core.
//!
//! This module provides common helper functions for setting up test databases
//! and creating catalog rows with sensible defaults.

use crate::{
    entities::{MenuItem, category, menu_item},
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness. Safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a category with the given display order.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
    display_order: i32,
) -> Result<category::Model> {
    category::ActiveModel {
        name: Set(name.to_string()),
        display_order: Set(display_order),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an available, uncategorised menu item with the given price.
pub async fn create_test_menu_item(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<menu_item::Model> {
    create_custom_menu_item(db, name, price, true, None, None).await
}

/// Creates a menu item with custom availability, popularity and category.
pub async fn create_custom_menu_item(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    is_available: bool,
    popularity_score: Option<f64>,
    category_id: Option<i64>,
) -> Result<menu_item::Model> {
    menu_item::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("{name} from the test kitchen")),
        price: Set(price),
        image_url: Set(None),
        is_veg: Set(true),
        is_available: Set(is_available),
        popularity_score: Set(popularity_score),
        category_id: Set(category_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Changes a menu price the way a catalog admin would.
pub async fn set_menu_price(db: &DatabaseConnection, menu_item_id: i64, price: f64) -> Result<()> {
    let mut item: menu_item::ActiveModel = MenuItem::find_by_id(menu_item_id)
        .one(db)
        .await?
        .ok_or(Error::MenuItemNotFound { id: menu_item_id })?
        .into();
    item.price = Set(price);
    item.update(db).await?;
    Ok(())
}

/// Sets up a database with two menu items.
/// Returns (db, tea at 10.0, samosa at 5.0).
pub async fn setup_with_menu() -> Result<(DatabaseConnection, menu_item::Model, menu_item::Model)> {
    let db = setup_test_db().await?;
    let tea = create_test_menu_item(&db, "Masala Tea", 10.0).await?;
    let samosa = create_test_menu_item(&db, "Samosa", 5.0).await?;
    Ok((db, tea, samosa))
}
