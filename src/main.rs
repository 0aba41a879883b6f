//! Server binary: open the database, migrate, seed, then serve the API.

use shop_api::{app, apply_migrations, db, seed, settings::LISTEN_ADDR, AppState, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shop_api=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env();
    let pool = db::connect(&settings).await?;
    apply_migrations(&pool).await?;
    seed(&pool).await?;

    let listener = TcpListener::bind(LISTEN_ADDR).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(AppState::new(pool))).await?;
    Ok(())
}
