// src/report.rs
//
// Turns analysis results into response rows. This is the only place values
// are rounded.

use crate::analyzer::{Analysis, InvestmentResult, TickerMetrics};
use crate::models::{MetricsRow, RoiRow, SeriesTable};
use quote_service::PriceMatrix;

pub const NOT_AVAILABLE: &str = "N/A";

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn roi_row(result: &InvestmentResult) -> RoiRow {
    RoiRow {
        ticker: result.symbol.clone(),
        initial_price: round2(result.initial_price),
        latest_price: round2(result.latest_price),
        shares_purchased: result.shares_purchased,
        final_value: round2(result.final_value),
        roi_dollars: round2(result.roi_dollars),
        roi_percent: round2(result.roi_percent),
    }
}

pub fn metrics_row(metrics: &TickerMetrics) -> MetricsRow {
    MetricsRow {
        ticker: metrics.symbol.clone(),
        growth_rate_percent: round2(metrics.growth_rate_percent),
        volatility_percent: round2(metrics.volatility_percent),
        cumulative_return_percent: round2(metrics.cumulative_return_percent),
        dividend_yield: metrics
            .dividend_yield
            .map(|y| format!("{:.2}%", y * 100.0))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        pe_ratio: metrics
            .pe_ratio
            .map(|pe| format!("{:.2}", pe))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        market_cap: metrics
            .market_cap
            .map(|cap| cap.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        sector: metrics
            .sector
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

pub fn price_table(matrix: &PriceMatrix) -> SeriesTable {
    SeriesTable {
        dates: matrix.dates().to_vec(),
        columns: matrix
            .columns()
            .map(|(symbol, column)| (symbol.to_string(), column.to_vec()))
            .collect(),
    }
}

pub fn growth_table(analysis: &Analysis) -> SeriesTable {
    SeriesTable {
        dates: analysis.dates.clone(),
        columns: analysis
            .tickers
            .iter()
            .map(|t| {
                let values = t.growth.values.iter().map(|v| v.map(round2)).collect();
                (t.growth.symbol.clone(), values)
            })
            .collect(),
    }
}
