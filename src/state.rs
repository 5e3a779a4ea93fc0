use sqlx::SqlitePool;

use crate::config::FeeConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub fees: FeeConfig,
}
