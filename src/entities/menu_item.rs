//! Menu item entity - Represents a purchasable dish or drink.
//!
//! Menu items are owned by the catalog; clients only read them. Prices are captured
//! into order lines at placement time, so later price edits never touch old orders.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Menu item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    /// Unique identifier for the menu item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name shown on the menu card
    #[sea_orm(unique)]
    pub name: String,
    /// Short description shown under the name
    pub description: String,
    /// Unit price in rupees, never negative
    pub price: f64,
    /// Optional picture for the menu card
    pub image_url: Option<String>,
    /// Vegetarian flag for the veg/non-veg badge
    pub is_veg: bool,
    /// Only available items are listed and can be added to a cart
    pub is_available: bool,
    /// Sort key for the menu, highest first
    pub popularity_score: Option<f64>,
    /// Category this item is listed under, if any
    pub category_id: Option<i64>,
}

/// Defines relationships between `MenuItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each menu item optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One menu item appears in many carts
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
