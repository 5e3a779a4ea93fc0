use sqlx::SqlitePool;
use tracing::info;

/// Ordered schema history. Append-only: each step must be safe to re-run
/// against a database where it already took effect, and applied versions are
/// recorded in `schema_migrations` so a step runs at most once.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_create_calculations",
        r#"
        CREATE TABLE IF NOT EXISTS calculations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            stock_name TEXT,
            stock_code TEXT,
            date TEXT,
            original_quantity REAL,
            original_cost REAL,
            buy_quantity REAL,
            buy_price REAL,
            sell_quantity REAL,
            sell_price REAL,
            new_cost REAL,
            profit_loss REAL,
            total_fees REAL,
            commission_rate REAL DEFAULT 0.0003,
            stamp_tax_rate REAL DEFAULT 0.001,
            transfer_fee REAL DEFAULT 0.00002,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ),
    (
        "0002_index_created_at",
        "CREATE INDEX IF NOT EXISTS idx_calculations_created_at ON calculations (created_at)",
    ),
];

pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    for &(version, sql) in MIGRATIONS {
        let applied: Option<(String,)> =
            sqlx::query_as("SELECT version FROM schema_migrations WHERE version = ?1")
                .bind(version)
                .fetch_optional(pool)
                .await?;
        if applied.is_some() {
            continue;
        }

        info!("Applying migration {}", version);
        sqlx::query(sql).execute(pool).await?;
        sqlx::query("INSERT INTO schema_migrations (version) VALUES (?1)")
            .bind(version)
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool")
    }

    #[tokio::test]
    async fn test_migrations_apply_once() {
        let pool = memory_pool().await;
        run(&pool).await.unwrap();
        // Second run must be a no-op, not an error
        run(&pool).await.unwrap();

        let (applied,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schema_migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }

    #[tokio::test]
    async fn test_calculations_table_exists_after_run() {
        let pool = memory_pool().await;
        run(&pool).await.unwrap();

        let (tables,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='calculations'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 1);
    }
}
