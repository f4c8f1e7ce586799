//! Menu catalog business logic - Read-only listing and filtering of the menu.
//!
//! Categories come back in ascending display order and items in descending popularity.
//! [`filter_items`] is a pure function so the menu view can re-run it on every keystroke
//! without touching the store. Seeding from `config.toml` lives here as well since it is
//! the only place catalog rows are ever written by this crate.

use crate::{
    config::menu::MenuConfig,
    entities::{Category, MenuItem, category, menu_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Category selection on the menu view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category, including uncategorised items
    #[default]
    All,
    /// Only items in this category
    Id(i64),
}

impl CategoryFilter {
    /// Whether an item with this category passes the filter
    #[must_use]
    pub fn matches(self, category_id: Option<i64>) -> bool {
        match self {
            Self::All => true,
            Self::Id(id) => category_id == Some(id),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<i64>()
            .map(Self::Id)
            .map_err(|_| Error::Validation {
                message: format!("Unknown category '{trimmed}'"),
            })
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Lists all categories, ordered by ascending display order.
#[instrument(skip(db))]
pub async fn list_categories<C>(db: &C) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .order_by_asc(category::Column::DisplayOrder)
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the menu items that can currently be ordered, most popular first.
///
/// Items without a popularity score sort after every scored item.
#[instrument(skip(db))]
pub async fn list_available_items<C>(db: &C) -> Result<Vec<menu_item::Model>>
where
    C: ConnectionTrait,
{
    let items = MenuItem::find()
        .filter(menu_item::Column::IsAvailable.eq(true))
        .order_by_desc(menu_item::Column::PopularityScore)
        .order_by_asc(menu_item::Column::Id)
        .all(db)
        .await?;
    debug!("Fetched {} available menu items", items.len());
    Ok(items)
}

/// Finds a menu item by id, whether or not it is available.
pub async fn get_menu_item<C>(db: &C, menu_item_id: i64) -> Result<Option<menu_item::Model>>
where
    C: ConnectionTrait,
{
    MenuItem::find_by_id(menu_item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Keeps the items whose name or description contains `search` (case-insensitive) and whose
/// category passes `category`.
///
/// Input order is preserved and an empty search matches everything.
#[must_use]
pub fn filter_items<'a>(
    items: &'a [menu_item::Model],
    search: &str,
    category: CategoryFilter,
) -> Vec<&'a menu_item::Model> {
    let needle = search.to_lowercase();
    items
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.name.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
        })
        .filter(|item| category.matches(item.category_id))
        .collect()
}

/// Summary of a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Categories inserted by this run
    pub categories_added: usize,
    /// Menu items inserted by this run
    pub items_added: usize,
}

/// Inserts the categories and menu items from `config` that are not already present.
///
/// Rows are matched by name, so running this on every start-up is safe and never
/// overwrites prices or availability edited in the store. All inserts share one
/// transaction: a rejected entry leaves the catalog exactly as it was.
///
/// # Errors
/// Returns an error if an item names a category missing from both the file and the
/// store, if a price is negative or not finite, or if any insert fails.
#[instrument(skip(db, config))]
pub async fn seed_menu(db: &DatabaseConnection, config: &MenuConfig) -> Result<SeedSummary> {
    if let Some(item_config) = config
        .items
        .iter()
        .find(|item| item.price < 0.0 || !item.price.is_finite())
    {
        return Err(Error::Config {
            message: format!(
                "Menu item '{}' has an invalid price {}",
                item_config.name, item_config.price
            ),
        });
    }

    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    for category_config in &config.categories {
        let exists = Category::find()
            .filter(category::Column::Name.eq(category_config.name.as_str()))
            .one(&txn)
            .await?
            .is_some();
        if exists {
            continue;
        }
        category::ActiveModel {
            name: Set(category_config.name.clone()),
            display_order: Set(category_config.display_order),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        summary.categories_added += 1;
    }

    let category_ids: HashMap<String, i64> = Category::find()
        .all(&txn)
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();

    for item_config in &config.items {
        let category_id = match &item_config.category {
            Some(name) => Some(*category_ids.get(name).ok_or_else(|| Error::Config {
                message: format!(
                    "Menu item '{}' refers to unknown category '{name}'",
                    item_config.name
                ),
            })?),
            None => None,
        };

        let exists = MenuItem::find()
            .filter(menu_item::Column::Name.eq(item_config.name.as_str()))
            .one(&txn)
            .await?
            .is_some();
        if exists {
            continue;
        }

        menu_item::ActiveModel {
            name: Set(item_config.name.clone()),
            description: Set(item_config.description.clone()),
            price: Set(item_config.price),
            image_url: Set(item_config.image_url.clone()),
            is_veg: Set(item_config.is_veg),
            is_available: Set(item_config.is_available),
            popularity_score: Set(item_config.popularity_score),
            category_id: Set(category_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        summary.items_added += 1;
    }

    txn.commit().await?;

    info!(
        "Menu seeding added {} categories and {} items",
        summary.categories_added, summary.items_added
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::menu::parse_menu_config;
    use crate::test_utils::*;

    fn item(id: i64, name: &str, description: &str, category_id: Option<i64>) -> menu_item::Model {
        menu_item::Model {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price: 10.0,
            image_url: None,
            is_veg: true,
            is_available: true,
            popularity_score: None,
            category_id,
        }
    }

    fn sample_items() -> Vec<menu_item::Model> {
        vec![
            item(1, "Chocolate Shake", "Thick and cold", Some(2)),
            item(2, "Masala Dosa", "Served with chutney", Some(1)),
            item(3, "Brownie", "Rich CHOCOLATE square", Some(2)),
            item(4, "Nachos", "With cheese dip", None),
            item(5, "Anchovy Toast", "Salty", Some(1)),
        ]
    }

    #[test]
    fn test_filter_empty_search_all_categories_returns_everything_in_order() {
        let items = sample_items();
        let filtered = filter_items(&items, "", CategoryFilter::All);
        let ids: Vec<i64> = filtered.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_filter_matches_name_or_description_case_insensitively() {
        let items = sample_items();
        let filtered = filter_items(&items, "cho", CategoryFilter::All);
        let ids: Vec<i64> = filtered.iter().map(|i| i.id).collect();
        // Brownie matches on its description only
        assert_eq!(ids, vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_filter_combines_search_and_category() {
        let items = sample_items();
        let filtered = filter_items(&items, "cho", CategoryFilter::Id(2));
        let ids: Vec<i64> = filtered.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let none = filter_items(&items, "dosa", CategoryFilter::Id(2));
        assert!(none.is_empty());
    }

    #[test]
    fn test_filter_is_stable_across_calls() {
        let items = sample_items();
        let first = filter_items(&items, "a", CategoryFilter::Id(1));
        let second = filter_items(&items, "a", CategoryFilter::Id(1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_category_filter_parsing() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(" ALL ".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("12".parse::<CategoryFilter>().unwrap(), CategoryFilter::Id(12));
        assert!(matches!(
            "snacks".parse::<CategoryFilter>(),
            Err(Error::Validation { .. })
        ));
        assert_eq!(CategoryFilter::Id(3).to_string(), "3");
    }

    #[tokio::test]
    async fn test_list_categories_sorted_by_display_order() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_category(&db, "Drinks", 3).await?;
        create_test_category(&db, "Breakfast", 1).await?;
        create_test_category(&db, "Lunch", 2).await?;

        let names: Vec<String> = list_categories(&db)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Breakfast", "Lunch", "Drinks"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_available_items_hides_unavailable_and_sorts_by_popularity() -> Result<()> {
        let db = setup_test_db().await?;
        create_custom_menu_item(&db, "Tea", 10.0, true, Some(2.0), None).await?;
        create_custom_menu_item(&db, "Coffee", 20.0, true, Some(4.5), None).await?;
        create_custom_menu_item(&db, "Soup", 40.0, false, Some(5.0), None).await?;
        create_custom_menu_item(&db, "Water", 5.0, true, None, None).await?;

        let names: Vec<String> = list_available_items(&db)
            .await?
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Coffee", "Tea", "Water"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_menu_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config = parse_menu_config(
            r#"
            [[categories]]
            name = "Snacks"
            display_order = 1

            [[items]]
            name = "Samosa"
            price = 15.0
            category = "Snacks"

            [[items]]
            name = "Lassi"
            price = 30.0
            "#,
        )?;

        let first = seed_menu(&db, &config).await?;
        assert_eq!(
            first,
            SeedSummary {
                categories_added: 1,
                items_added: 2
            }
        );

        let second = seed_menu(&db, &config).await?;
        assert_eq!(second, SeedSummary::default());

        let items = list_available_items(&db).await?;
        let samosa = items.iter().find(|i| i.name == "Samosa").unwrap();
        let snacks = list_categories(&db).await?;
        assert_eq!(samosa.category_id, Some(snacks[0].id));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_menu_rejects_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;
        let config = parse_menu_config(
            r#"
            [[items]]
            name = "Samosa"
            price = 15.0
            category = "Nowhere"
            "#,
        )?;
        let result = seed_menu(&db, &config).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_menu_rejects_bad_price_without_writing() -> Result<()> {
        let db = setup_test_db().await?;
        let config = parse_menu_config(
            r#"
            [[categories]]
            name = "Snacks"
            display_order = 1

            [[items]]
            name = "Samosa"
            price = 15.0
            category = "Snacks"

            [[items]]
            name = "Broken"
            price = -1.0
            "#,
        )?;
        let result = seed_menu(&db, &config).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        assert!(Category::find().all(&db).await?.is_empty());
        assert!(MenuItem::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_menu_unknown_category_rolls_back_earlier_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let config = parse_menu_config(
            r#"
            [[categories]]
            name = "Snacks"
            display_order = 1

            [[items]]
            name = "Samosa"
            price = 15.0
            category = "Snacks"

            [[items]]
            name = "Lassi"
            price = 30.0
            category = "Drinks"
            "#,
        )?;
        let result = seed_menu(&db, &config).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        assert!(Category::find().all(&db).await?.is_empty());
        assert!(MenuItem::find().all(&db).await?.is_empty());
        Ok(())
    }
}
