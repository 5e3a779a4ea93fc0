use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{CalculationRecord, NewCalculation, RestoredCalculation};

pub async fn insert(pool: &SqlitePool, input: NewCalculation) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO calculations (
            stock_name, stock_code, date,
            original_quantity, original_cost, buy_quantity, buy_price,
            sell_quantity, sell_price, new_cost, profit_loss, total_fees,
            commission_rate, stamp_tax_rate, transfer_fee, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        "#,
    )
    .bind(&input.stock_name)
    .bind(&input.stock_code)
    .bind(&input.date)
    .bind(input.legs.original_quantity)
    .bind(input.legs.original_cost)
    .bind(input.legs.buy_quantity)
    .bind(input.legs.buy_price)
    .bind(input.legs.sell_quantity)
    .bind(input.legs.sell_price)
    .bind(input.outcome.new_cost)
    .bind(input.outcome.profit_loss)
    .bind(input.outcome.total_fees)
    .bind(input.rates.commission_rate)
    .bind(input.rates.stamp_tax_rate)
    .bind(input.rates.transfer_fee)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Restore path: the fee-rate columns are omitted so they take their
/// schema-level defaults; everything else is stored as supplied.
pub async fn insert_restored(
    pool: &SqlitePool,
    record: RestoredCalculation,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO calculations (
            stock_name, stock_code, date,
            original_quantity, original_cost, buy_quantity, buy_price,
            sell_quantity, sell_price, new_cost, profit_loss, total_fees,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(&record.stock_name)
    .bind(&record.stock_code)
    .bind(&record.date)
    .bind(record.original_quantity)
    .bind(record.original_cost)
    .bind(record.buy_quantity)
    .bind(record.buy_price)
    .bind(record.sell_quantity)
    .bind(record.sell_price)
    .bind(record.new_cost)
    .bind(record.profit_loss)
    .bind(record.total_fees)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_page(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<CalculationRecord>, sqlx::Error> {
    sqlx::query_as::<_, CalculationRecord>(
        "SELECT * FROM calculations ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM calculations")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn delete_one(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM calculations WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_all(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM calculations")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
