use canteen_connect::config::{database, menu};
use canteen_connect::core::catalog;
use canteen_connect::errors::Result;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed the catalog from the menu file
    let menu_path = menu::menu_config_path()?;
    let menu_config = menu::load_menu_config(&menu_path)
        .inspect_err(|e| error!("Failed to load menu from {}: {}", menu_path, e))?;
    catalog::seed_menu(&db, &menu_config)
        .await
        .inspect_err(|e| error!("Failed to seed menu: {}", e))?;

    // 5. Report what the menu view will show
    let categories = catalog::list_categories(&db).await?;
    let items = catalog::list_available_items(&db).await?;
    for category in &categories {
        let count = items
            .iter()
            .filter(|i| i.category_id == Some(category.id))
            .count();
        info!("{}: {} items", category.name, count);
    }
    info!(
        "Canteen ready: {} categories, {} available items",
        categories.len(),
        items.len()
    );

    Ok(())
}
