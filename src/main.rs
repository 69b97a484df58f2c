use dotenvy::dotenv;
use tabledesk::{
    api::{AppState, router},
    config::{
        self,
        database::{create_connection, create_tables},
    },
    errors::Result,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 2. Load the application configuration (file, then env overrides)
    let app_config = config::load_app_configuration()?;

    // 3. Initialize tracing; RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.log_filter)),
        )
        .init();
    info!(instance = ?app_config.instance, "Configuration loaded");

    // 4. Connect and make sure this instance's tables exist
    let db = create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db, app_config.instance)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Serve
    let state = AppState {
        db: Arc::new(db),
        instance: app_config.instance,
    };
    let app = router(state, &app_config.api_path);
    let listener = TcpListener::bind(&app_config.bind_addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.bind_addr, e))?;
    info!(
        "Listening on http://{}{}",
        app_config.bind_addr, app_config.api_path
    );
    axum::serve(listener, app).await?;

    Ok(())
}
