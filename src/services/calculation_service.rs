use serde_json::Value;
use sqlx::SqlitePool;

use crate::config::FeeConfig;
use crate::db::calculation_queries;
use crate::errors::AppError;
use crate::models::{
    CalculationInput, CalculationOutcome, HistoryPage, NewCalculation, RestoredCalculation,
    TradeLegs,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

/// Fee, cost-basis and profit/loss arithmetic for one intraday round-trip.
///
/// Operation order matters: results must be reproducible bit-for-bit for
/// identical inputs, so no term is rearranged or pre-rounded.
pub fn compute(legs: TradeLegs, rates: FeeConfig) -> CalculationOutcome {
    let buy_commission = legs.buy_quantity * legs.buy_price * rates.commission_rate;
    let sell_commission = legs.sell_quantity * legs.sell_price * rates.commission_rate;
    let stamp_tax = legs.sell_quantity * legs.sell_price * rates.stamp_tax_rate;
    let transfer_fee_total = (legs.buy_quantity + legs.sell_quantity) * rates.transfer_fee;
    let total_fees = buy_commission + sell_commission + stamp_tax + transfer_fee_total;

    let new_quantity = legs.original_quantity + legs.buy_quantity - legs.sell_quantity;
    // A fully closed position has no cost basis left to average
    let new_cost = if new_quantity == 0.0 {
        0.0
    } else {
        (legs.original_quantity * legs.original_cost + legs.buy_quantity * legs.buy_price
            - legs.sell_quantity * legs.sell_price)
            / new_quantity
    };

    let profit_loss = (legs.sell_price - legs.buy_price) * legs.sell_quantity - total_fees;

    CalculationOutcome {
        new_cost,
        profit_loss,
        total_fees,
    }
}

/// Field-by-field validation of a calculate request body. Text fields must
/// be present and non-empty, the six trade fields must be JSON numbers, and
/// the rate fields fall back to the configured defaults when absent.
pub fn validate(body: &Value, defaults: FeeConfig) -> Result<CalculationInput, AppError> {
    let stock_name = text_field(body, "stock_name")?;
    let stock_code = text_field(body, "stock_code")?;
    let date = text_field(body, "date")?;

    let legs = TradeLegs {
        original_quantity: numeric_field(body, "original_quantity")?,
        original_cost: numeric_field(body, "original_cost")?,
        buy_quantity: numeric_field(body, "buy_quantity")?,
        buy_price: numeric_field(body, "buy_price")?,
        sell_quantity: numeric_field(body, "sell_quantity")?,
        sell_price: numeric_field(body, "sell_price")?,
    };

    let rates = FeeConfig {
        commission_rate: rate_field(body, "commission_rate", defaults.commission_rate)?,
        stamp_tax_rate: rate_field(body, "stamp_tax_rate", defaults.stamp_tax_rate)?,
        transfer_fee: rate_field(body, "transfer_fee", defaults.transfer_fee)?,
    };

    Ok(CalculationInput {
        stock_name,
        stock_code,
        date,
        legs,
        rates,
    })
}

fn text_field(body: &Value, key: &str) -> Result<String, AppError> {
    match body.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(AppError::Validation),
    }
}

fn numeric_field(body: &Value, key: &str) -> Result<f64, AppError> {
    body.get(key)
        .and_then(Value::as_f64)
        .ok_or(AppError::Validation)
}

fn rate_field(body: &Value, key: &str, default: f64) -> Result<f64, AppError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_f64().ok_or(AppError::Validation),
    }
}

/// Validate, compute and persist one adjustment. Nothing is written when
/// validation fails.
pub async fn create(
    pool: &SqlitePool,
    defaults: FeeConfig,
    body: Value,
) -> Result<CalculationOutcome, AppError> {
    let input = validate(&body, defaults)?;
    let outcome = compute(input.legs, input.rates);

    calculation_queries::insert(
        pool,
        NewCalculation {
            stock_name: input.stock_name,
            stock_code: input.stock_code,
            date: input.date,
            legs: input.legs,
            rates: input.rates,
            outcome,
        },
    )
    .await
    .map_err(AppError::storage("Failed to save calculation"))?;

    Ok(outcome)
}

pub async fn history_page(
    pool: &SqlitePool,
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<HistoryPage, AppError> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let offset = (page - 1) * limit;

    let data = calculation_queries::fetch_page(pool, limit, offset)
        .await
        .map_err(AppError::storage("Failed to fetch history"))?;
    let total = calculation_queries::count(pool)
        .await
        .map_err(AppError::storage("Failed to fetch total records"))?;

    Ok(HistoryPage {
        data,
        total,
        page,
        limit,
    })
}

/// Succeeds whether or not a row matched.
pub async fn delete_one(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    calculation_queries::delete_one(pool, id)
        .await
        .map_err(AppError::storage("Failed to delete record"))?;
    Ok(())
}

pub async fn delete_all(pool: &SqlitePool) -> Result<(), AppError> {
    calculation_queries::delete_all(pool)
        .await
        .map_err(AppError::storage("Failed to delete all records"))?;
    Ok(())
}

/// Re-inserts a previously deleted record. The supplied derived values are
/// stored verbatim, without recomputation against the formulas above.
pub async fn restore(pool: &SqlitePool, record: RestoredCalculation) -> Result<(), AppError> {
    calculation_queries::insert_restored(pool, record)
        .await
        .map_err(AppError::storage("Failed to restore record"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPS: f64 = 1e-9;

    fn example_legs() -> TradeLegs {
        TradeLegs {
            original_quantity: 1000.0,
            original_cost: 10.0,
            buy_quantity: 500.0,
            buy_price: 9.5,
            sell_quantity: 500.0,
            sell_price: 10.2,
        }
    }

    fn example_body() -> Value {
        json!({
            "stock_name": "平安银行",
            "stock_code": "000001",
            "date": "2024-03-15",
            "original_quantity": 1000.0,
            "original_cost": 10.0,
            "buy_quantity": 500.0,
            "buy_price": 9.5,
            "sell_quantity": 500.0,
            "sell_price": 10.2
        })
    }

    #[test]
    fn test_worked_example() {
        let out = compute(example_legs(), FeeConfig::default());

        // 500*9.5*0.0003 + 500*10.2*0.0003 + 500*10.2*0.001 + 1000*0.00002
        assert!((out.total_fees - 8.075).abs() < EPS);
        // (1000*10 + 500*9.5 - 500*10.2) / 1000
        assert!((out.new_cost - 9.65).abs() < EPS);
        // (10.2 - 9.5)*500 - 8.075
        assert!((out.profit_loss - 341.925).abs() < EPS);
    }

    #[test]
    fn test_closed_position_has_zero_cost() {
        let legs = TradeLegs {
            original_quantity: 500.0,
            original_cost: 12.0,
            buy_quantity: 100.0,
            buy_price: 11.5,
            sell_quantity: 600.0,
            sell_price: 12.3,
        };
        let out = compute(legs, FeeConfig::default());
        assert_eq!(out.new_cost, 0.0);
    }

    #[test]
    fn test_total_fees_decomposition() {
        let legs = example_legs();
        let rates = FeeConfig {
            commission_rate: 0.00025,
            stamp_tax_rate: 0.0005,
            transfer_fee: 0.00001,
        };
        let out = compute(legs, rates);

        let expected = legs.buy_quantity * legs.buy_price * rates.commission_rate
            + legs.sell_quantity * legs.sell_price * rates.commission_rate
            + legs.sell_quantity * legs.sell_price * rates.stamp_tax_rate
            + (legs.buy_quantity + legs.sell_quantity) * rates.transfer_fee;
        assert_eq!(out.total_fees, expected);
    }

    #[test]
    fn test_validate_accepts_complete_body() {
        let input = validate(&example_body(), FeeConfig::default()).unwrap();
        assert_eq!(input.stock_code, "000001");
        assert_eq!(input.legs.buy_quantity, 500.0);
        // Absent rates fall back to the defaults
        assert_eq!(input.rates.commission_rate, 0.0003);
        assert_eq!(input.rates.stamp_tax_rate, 0.001);
        assert_eq!(input.rates.transfer_fee, 0.00002);
    }

    #[test]
    fn test_validate_rejects_missing_or_empty_text() {
        let mut body = example_body();
        body.as_object_mut().unwrap().remove("stock_name");
        assert!(matches!(
            validate(&body, FeeConfig::default()),
            Err(AppError::Validation)
        ));

        let mut body = example_body();
        body["stock_code"] = json!("");
        assert!(matches!(
            validate(&body, FeeConfig::default()),
            Err(AppError::Validation)
        ));
    }

    #[test]
    fn test_validate_rejects_non_numeric_leg() {
        let mut body = example_body();
        body["buy_price"] = json!("9.5");
        assert!(matches!(
            validate(&body, FeeConfig::default()),
            Err(AppError::Validation)
        ));

        let mut body = example_body();
        body.as_object_mut().unwrap().remove("sell_quantity");
        assert!(matches!(
            validate(&body, FeeConfig::default()),
            Err(AppError::Validation)
        ));
    }

    #[test]
    fn test_validate_applies_supplied_rates() {
        let mut body = example_body();
        body["commission_rate"] = json!(0.0001);
        let input = validate(&body, FeeConfig::default()).unwrap();
        assert_eq!(input.rates.commission_rate, 0.0001);
        assert_eq!(input.rates.stamp_tax_rate, 0.001);
    }

    #[test]
    fn test_identical_inputs_produce_identical_outcomes() {
        let a = compute(example_legs(), FeeConfig::default());
        let b = compute(example_legs(), FeeConfig::default());
        assert_eq!(a, b);
    }
}
