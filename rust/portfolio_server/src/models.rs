// src/models.rs

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PRINCIPAL: f64 = 1000.0;

fn default_principal() -> f64 {
    DEFAULT_PRINCIPAL
}

// Accepted and echoed back; it does not change any output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ViewGranularity {
    Daily,
    #[default]
    Monthly,
    Yearly,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PerformanceRequest {
    // Multi-select picks
    #[serde(default)]
    pub tickers: Vec<String>,
    // Comma-separated free text
    #[serde(default)]
    pub custom_tickers: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(min = 0.0))]
    #[serde(default = "default_principal")]
    pub principal: f64,
    #[serde(default)]
    pub view: ViewGranularity,
}

impl PerformanceRequest {
    /// Picks followed by free-text entries, trimmed, upper-cased and de-duplicated.
    pub fn selected_tickers(&self) -> Vec<String> {
        self.tickers
            .iter()
            .map(String::as_str)
            .chain(self.custom_tickers.split(','))
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Column table for prices and growth: shared dates, one column per ticker.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SeriesTable {
    pub dates: Vec<NaiveDate>,
    pub columns: IndexMap<String, Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoiRow {
    pub ticker: String,
    pub initial_price: f64,
    pub latest_price: f64,
    pub shares_purchased: f64,
    pub final_value: f64,
    pub roi_dollars: f64,
    pub roi_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricsRow {
    pub ticker: String,
    pub growth_rate_percent: f64,
    pub volatility_percent: f64,
    pub cumulative_return_percent: f64,
    pub dividend_yield: String,
    pub pe_ratio: String,
    pub market_cap: String,
    pub sector: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PerformanceResponse {
    pub success: bool,
    pub message: String,
    pub warnings: Vec<String>,
    pub view: ViewGranularity,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub prices: SeriesTable,
    pub roi: Vec<RoiRow>,
    pub growth: SeriesTable,
    pub metrics: Vec<MetricsRow>,
}

impl PerformanceResponse {
    /// A response that carries only a message and warnings.
    pub fn empty(request: &PerformanceRequest, message: impl Into<String>, warnings: Vec<String>) -> Self {
        PerformanceResponse {
            success: false,
            message: message.into(),
            warnings,
            view: request.view,
            start_date: request.start_date,
            end_date: request.end_date,
            prices: SeriesTable::default(),
            roi: Vec::new(),
            growth: SeriesTable::default(),
            metrics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ContactResult {
    pub success: bool,
    pub message: String,
}
