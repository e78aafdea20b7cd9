use dotenvy::dotenv;
use hotspot_panel::{
    config, core,
    errors::Result,
    web::{self, AppState, unix_now},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenv().ok();

    // 3. Load application settings
    let settings = config::settings::load_default_settings()?;
    info!("loaded application settings");

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("database connection established"))
        .inspect_err(|e| error!("failed to connect to database: {e}"))?;
    config::database::create_tables(&db).await?;

    // 5. Seed the bootstrap admin when credentials are configured
    if let Some((email, password)) = config::settings::bootstrap_admin_credentials() {
        core::auth::ensure_bootstrap_admin(&db, &email, &password, unix_now()).await?;
    } else {
        info!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin bootstrap");
    }

    // 6. Run the HTTP server
    let state = AppState::new(db, Arc::new(settings));
    web::serve(state).await
}
