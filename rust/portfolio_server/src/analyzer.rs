// src/analyzer.rs
//
// Return-on-investment and volatility over a price matrix. Everything here is
// unrounded; rounding happens when the response rows are built.

use chrono::NaiveDate;
use quote_service::{PriceMatrix, TickerMetadata};
use serde::Serialize;
use thiserror::Error;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    #[error("{symbol} has insufficient history ({observations} price point(s), at least 2 needed)")]
    InsufficientHistory { symbol: String, observations: usize },

    #[error("{symbol} has a non-positive initial price ({price})")]
    NonPositiveInitialPrice { symbol: String, price: f64 },
}

impl AnalysisError {
    pub fn symbol(&self) -> &str {
        match self {
            AnalysisError::InsufficientHistory { symbol, .. } => symbol,
            AnalysisError::NonPositiveInitialPrice { symbol, .. } => symbol,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentResult {
    pub symbol: String,
    pub initial_price: f64,
    pub latest_price: f64,
    pub shares_purchased: f64,
    pub final_value: f64,
    pub roi_dollars: f64,
    pub roi_percent: f64,
}

/// Gain or loss of the principal at each matrix date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSeries {
    pub symbol: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceMetrics {
    pub growth_rate_percent: f64,
    pub volatility_percent: f64,
    pub cumulative_return_percent: f64,
}

/// Price-derived metrics joined with the symbol's fundamentals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerMetrics {
    pub symbol: String,
    pub growth_rate_percent: f64,
    pub volatility_percent: f64,
    pub cumulative_return_percent: f64,
    pub dividend_yield: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub market_cap: Option<i64>,
    pub sector: Option<String>,
}

impl TickerMetrics {
    pub fn new(symbol: &str, metrics: &PriceMetrics, metadata: TickerMetadata) -> Self {
        TickerMetrics {
            symbol: symbol.to_string(),
            growth_rate_percent: metrics.growth_rate_percent,
            volatility_percent: metrics.volatility_percent,
            cumulative_return_percent: metrics.cumulative_return_percent,
            dividend_yield: metadata.dividend_yield,
            pe_ratio: metadata.pe_ratio,
            market_cap: metadata.market_cap,
            sector: metadata.sector,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerAnalysis {
    pub investment: InvestmentResult,
    pub growth: GrowthSeries,
    pub metrics: PriceMetrics,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub dates: Vec<NaiveDate>,
    pub tickers: Vec<TickerAnalysis>,
    pub skipped: Vec<AnalysisError>,
}

// Day-over-day percentage change between consecutive prices, as a fraction.
pub fn daily_pct_changes(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Sample standard deviation of daily changes, scaled by √252, in percent.
///
/// A single change has no dispersion and yields 0.
pub fn annualized_volatility_percent(prices: &[f64]) -> f64 {
    let returns = daily_pct_changes(prices);
    let n = returns.len();
    if n < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / n as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

pub fn cumulative_return_percent(prices: &[f64]) -> f64 {
    let growth: f64 = daily_pct_changes(prices).iter().map(|r| 1.0 + r).product();
    (growth - 1.0) * 100.0
}

pub fn investment_result(
    symbol: &str,
    initial_price: f64,
    latest_price: f64,
    principal: f64,
) -> InvestmentResult {
    let shares_purchased = principal / initial_price;
    let final_value = shares_purchased * latest_price;
    InvestmentResult {
        symbol: symbol.to_string(),
        initial_price,
        latest_price,
        shares_purchased,
        final_value,
        roi_dollars: final_value - principal,
        roi_percent: (latest_price - initial_price) / initial_price * 100.0,
    }
}

pub fn growth_series(
    symbol: &str,
    column: &[Option<f64>],
    initial_price: f64,
    principal: f64,
) -> GrowthSeries {
    GrowthSeries {
        symbol: symbol.to_string(),
        values: column
            .iter()
            .map(|price| price.map(|p| (p / initial_price - 1.0) * principal))
            .collect(),
    }
}

pub fn analyze_ticker(
    symbol: &str,
    column: &[Option<f64>],
    principal: f64,
) -> Result<TickerAnalysis, AnalysisError> {
    let prices: Vec<f64> = column.iter().flatten().copied().collect();

    let (initial_price, latest_price) = match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) if prices.len() >= 2 => (first, last),
        _ => {
            return Err(AnalysisError::InsufficientHistory {
                symbol: symbol.to_string(),
                observations: prices.len(),
            })
        }
    };
    if initial_price <= 0.0 {
        return Err(AnalysisError::NonPositiveInitialPrice {
            symbol: symbol.to_string(),
            price: initial_price,
        });
    }

    let investment = investment_result(symbol, initial_price, latest_price, principal);
    let metrics = PriceMetrics {
        growth_rate_percent: investment.roi_percent,
        volatility_percent: annualized_volatility_percent(&prices),
        cumulative_return_percent: cumulative_return_percent(&prices),
    };

    Ok(TickerAnalysis {
        growth: growth_series(symbol, column, initial_price, principal),
        investment,
        metrics,
    })
}

/// Analyzes every column of `matrix`. Columns that cannot be analyzed are
/// reported in [`Analysis::skipped`] and the rest proceed.
pub fn analyze(matrix: &PriceMatrix, principal: f64) -> Analysis {
    let mut analysis = Analysis {
        dates: matrix.dates().to_vec(),
        ..Analysis::default()
    };

    for (symbol, column) in matrix.columns() {
        match analyze_ticker(symbol, column, principal) {
            Ok(ticker) => analysis.tickers.push(ticker),
            Err(err) => analysis.skipped.push(err),
        }
    }

    analysis
}
