mod calculation;

pub use calculation::{
    CalculationInput, CalculationOutcome, CalculationRecord, HistoryPage, HistoryQuery,
    NewCalculation, RestoredCalculation, SuccessResponse, TradeLegs,
};
