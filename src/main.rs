use dotenvy::dotenv;
use product_inventory::{config, entities, errors::Result};
use sea_orm::{Database, EntityTrait, PaginatorTrait};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the application configuration (config.toml + environment)
    let app_config = config::settings::load_default_config()?;
    info!(
        default_page_size = app_config.default_page_size,
        "Loaded application configuration."
    );

    // 4. Connect and ensure the schema exists
    let db = Database::connect(&app_config.database_url).await?;
    config::database::create_tables(&db).await?;
    info!(database_url = %app_config.database_url, "Database initialized.");

    let product_count = entities::Product::find().count(&db).await?;
    info!(product_count, "Inventory core ready.");

    Ok(())
}
