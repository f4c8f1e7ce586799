//! Menu configuration loading from config.toml
//!
//! The catalog is seeded from a TOML file on start-up. Categories are listed first and
//! items refer to them by name, so the file never has to know database ids.

use crate::config::env_or;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the whole menu file
#[derive(Debug, Deserialize)]
pub struct MenuConfig {
    /// Categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Menu items to seed
    #[serde(default)]
    pub items: Vec<MenuItemConfig>,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Display name, unique
    pub name: String,
    /// Ascending sort key
    pub display_order: i32,
}

/// Configuration for a single menu item
#[derive(Debug, Deserialize, Clone)]
pub struct MenuItemConfig {
    /// Display name, unique
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Picture for the menu card
    #[serde(default)]
    pub image_url: Option<String>,
    /// Vegetarian flag
    #[serde(default)]
    pub is_veg: bool,
    /// Whether the item can be ordered
    #[serde(default = "default_available")]
    pub is_available: bool,
    /// Menu sort key, highest first
    #[serde(default)]
    pub popularity_score: Option<f64>,
    /// Name of a category from the same file
    #[serde(default)]
    pub category: Option<String>,
}

const fn default_available() -> bool {
    true
}

/// Loads the menu configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_menu_config<P: AsRef<Path>>(path: P) -> Result<MenuConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading menu configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref)?;

    parse_menu_config(&contents)
}

/// Parses menu configuration from TOML text
pub fn parse_menu_config(contents: &str) -> Result<MenuConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse menu config: {e}"),
    })
}

/// Path of the menu file, from `MENU_CONFIG` or `./config.toml`
///
/// # Errors
/// Returns `Error::EnvVar` if `MENU_CONFIG` is set but not valid unicode.
pub fn menu_config_path() -> Result<String> {
    env_or("MENU_CONFIG", "config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_menu_config() {
        let toml_str = r#"
            [[categories]]
            name = "Snacks"
            display_order = 2

            [[items]]
            name = "Samosa"
            description = "Crispy pastry with spiced potato"
            price = 15.0
            is_veg = true
            popularity_score = 4.5
            category = "Snacks"

            [[items]]
            name = "Chicken Roll"
            price = 60.0
            is_available = false
        "#;

        let config = parse_menu_config(toml_str).unwrap();
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].display_order, 2);
        assert_eq!(config.items.len(), 2);
        assert_eq!(config.items[0].price, 15.0);
        assert_eq!(config.items[0].category.as_deref(), Some("Snacks"));
        assert!(config.items[0].is_available);
        assert!(!config.items[1].is_veg);
        assert!(!config.items[1].is_available);
        assert!(config.items[1].description.is_empty());
    }

    #[test]
    fn test_parse_menu_config_rejects_missing_price() {
        let result = parse_menu_config("[[items]]\nname = \"Tea\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_menu_config_missing_file() {
        let result = load_menu_config("definitely/not/here.toml");
        assert!(matches!(
            result,
            Err(Error::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound
        ));
    }
}
