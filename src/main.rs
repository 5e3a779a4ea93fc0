use std::net::SocketAddr;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

use tcost_backend::config::{FeeConfig, ServerConfig};
use tcost_backend::logging::{self, LoggingConfig};
use tcost_backend::state::AppState;
use tcost_backend::{app, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())?;

    let config = ServerConfig::from_env();

    // The SQLite file lives in a subdirectory that may not exist on first run
    if let Some(db_path) = config.database_url.strip_prefix("sqlite://") {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    db::migrations::run(&pool).await?;

    let state = AppState {
        pool,
        fees: FeeConfig::default(),
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 tcost backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
