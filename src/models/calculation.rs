use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::config::FeeConfig;

/// One persisted T+0 adjustment computation, as stored in `calculations`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalculationRecord {
    pub id: i64,
    pub stock_name: String,
    pub stock_code: String,
    pub date: String,
    pub original_quantity: f64,
    pub original_cost: f64,
    pub buy_quantity: f64,
    pub buy_price: f64,
    pub sell_quantity: f64,
    pub sell_price: f64,
    pub new_cost: f64,
    pub profit_loss: f64,
    pub total_fees: f64,
    pub commission_rate: f64,
    pub stamp_tax_rate: f64,
    pub transfer_fee: f64,
    pub created_at: DateTime<Utc>,
}

/// The six numeric trade inputs: the existing position plus the intraday
/// buy and sell legs. Quantities and prices are trusted once validated.
#[derive(Debug, Clone, Copy)]
pub struct TradeLegs {
    pub original_quantity: f64,
    pub original_cost: f64,
    pub buy_quantity: f64,
    pub buy_price: f64,
    pub sell_quantity: f64,
    pub sell_price: f64,
}

/// Derived values returned by the calculate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub new_cost: f64,
    pub profit_loss: f64,
    pub total_fees: f64,
}

/// Validated calculate request, ready to be computed and persisted.
#[derive(Debug, Clone)]
pub struct CalculationInput {
    pub stock_name: String,
    pub stock_code: String,
    pub date: String,
    pub legs: TradeLegs,
    pub rates: FeeConfig,
}

/// Insert payload for the calculate path: inputs, the rates actually used,
/// and the derived values recomputed at write time.
#[derive(Debug, Clone)]
pub struct NewCalculation {
    pub stock_name: String,
    pub stock_code: String,
    pub date: String,
    pub legs: TradeLegs,
    pub rates: FeeConfig,
    pub outcome: CalculationOutcome,
}

/// Restore request: a previously deleted record minus the fee-rate columns,
/// which take their schema-level defaults on insert. Derived values are
/// stored exactly as supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoredCalculation {
    pub stock_name: String,
    pub stock_code: String,
    pub date: String,
    pub original_quantity: f64,
    pub original_cost: f64,
    pub buy_quantity: f64,
    pub buy_price: f64,
    pub sell_quantity: f64,
    pub sell_price: f64,
    pub new_cost: f64,
    pub profit_loss: f64,
    pub total_fees: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// One page of history plus the effective pagination parameters.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryPage {
    pub data: Vec<CalculationRecord>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
