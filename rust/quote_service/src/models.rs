// src/models.rs

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// Custom function to convert a JSON string to f64
fn string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<f64>().map_err(serde::de::Error::custom)
}

// The provider writes "None", "-" or "" for fields it has no value for.
fn present(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "None" && s != "-")
}

fn string_to_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(present(Option::<String>::deserialize(deserializer)?))
}

fn string_to_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(present(Option::<String>::deserialize(deserializer)?).and_then(|s| s.parse::<f64>().ok()))
}

fn string_to_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(present(Option::<String>::deserialize(deserializer)?).and_then(|s| s.parse::<i64>().ok()))
}

// Define Overview API structure
//
// Only the fields shown next to the performance metrics are kept. Everything
// except the symbol may be missing for ETFs and funds.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct OverviewResponse {
    pub symbol: String,
    #[serde(default, deserialize_with = "string_to_opt_string")]
    pub asset_type: Option<String>,
    #[serde(default, deserialize_with = "string_to_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_to_opt_string")]
    pub exchange: Option<String>,
    #[serde(default, deserialize_with = "string_to_opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "string_to_opt_string")]
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "string_to_opt_i64")]
    pub market_capitalization: Option<i64>,
    #[serde(rename = "PERatio", default, deserialize_with = "string_to_opt_f64")]
    pub pe_ratio: Option<f64>,
    #[serde(default, deserialize_with = "string_to_opt_f64")]
    pub dividend_yield: Option<f64>,
}

/// Per-symbol fundamentals shown next to the computed metrics.
///
/// Every field is optional; a failed lookup yields [`TickerMetadata::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickerMetadata {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub dividend_yield: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub market_cap: Option<i64>,
}

impl From<OverviewResponse> for TickerMetadata {
    fn from(overview: OverviewResponse) -> Self {
        TickerMetadata {
            name: overview.name,
            sector: overview.sector,
            dividend_yield: overview.dividend_yield,
            pe_ratio: overview.pe_ratio,
            market_cap: overview.market_capitalization,
        }
    }
}

// Struct for the stock prices for each date
#[derive(Debug, Deserialize)]
pub struct DailyAdjustedBar {
    #[serde(rename = "4. close", deserialize_with = "string_to_f64")]
    pub close: f64,

    #[serde(rename = "5. adjusted close", deserialize_with = "string_to_f64")]
    pub adjusted_close: f64,
}

// Struct for the overall response
#[derive(Debug, Deserialize)]
pub struct DailyAdjustedResponse {
    #[serde(rename = "Time Series (Daily)")]
    pub time_series: BTreeMap<NaiveDate, DailyAdjustedBar>,
}

#[derive(Debug, Deserialize)]
pub struct DigitalCurrencyBar {
    #[serde(rename = "4. close", deserialize_with = "string_to_f64")]
    pub close: f64,
}

#[derive(Debug, Deserialize)]
pub struct DigitalCurrencyResponse {
    #[serde(rename = "Time Series (Digital Currency Daily)")]
    pub time_series: BTreeMap<NaiveDate, DigitalCurrencyBar>,
}

/// Every provider reply is HTTP 200; failures are told apart by the body shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProviderEnvelope<T> {
    Data(T),
    Error {
        #[serde(rename = "Error Message")]
        error_message: String,
    },
    Limited {
        #[serde(rename = "Note", alias = "Information")]
        note: String,
    },
    Other(serde_json::Value),
}
