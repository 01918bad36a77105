// src/client.rs

use crate::matrix::PricePoint;
use crate::models::{
    DailyAdjustedResponse, DigitalCurrencyResponse, OverviewResponse, ProviderEnvelope,
    TickerMetadata,
};
use chrono::NaiveDate;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

// Quote currencies that mark a `BASE-QUOTE` symbol as a crypto pair.
const CRYPTO_MARKETS: &[&str] = &["USD", "EUR", "GBP", "JPY", "CAD", "AUD", "CHF", "CNY"];

const DAILY_SERIES_KEY: &str = "Time Series (Daily)";
const CRYPTO_SERIES_KEY: &str = "Time Series (Digital Currency Daily)";
const OVERVIEW_KEY: &str = "Symbol";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider error: {0}")]
    Api(String),

    #[error("provider rate limit reached: {0}")]
    RateLimited(String),

    #[error("no price data returned")]
    NoData,

    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Failures worth retrying on the next identical request.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::RateLimited(_))
    }
}

/// How a symbol is routed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetClass {
    Equity,
    Crypto { base: String, market: String },
}

impl AssetClass {
    pub fn of(symbol: &str) -> Self {
        if let Some((base, market)) = symbol.split_once('-') {
            if base.len() >= 2 && CRYPTO_MARKETS.contains(&market) {
                return AssetClass::Crypto {
                    base: base.to_string(),
                    market: market.to_string(),
                };
            }
        }
        AssetClass::Equity
    }
}

pub struct QuoteClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl QuoteClient {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        QuoteClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Adjusted daily closes for `symbol` within `[start, end)`, oldest first.
    pub async fn daily_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, FetchError> {
        let in_range = |date: &NaiveDate| *date >= start && *date < end;

        let points: Vec<PricePoint> = match AssetClass::of(symbol) {
            AssetClass::Equity => {
                let response: DailyAdjustedResponse = self
                    .query(
                        &[
                            ("function", "TIME_SERIES_DAILY_ADJUSTED"),
                            ("symbol", symbol),
                            ("outputsize", "full"),
                        ],
                        DAILY_SERIES_KEY,
                    )
                    .await?;
                response
                    .time_series
                    .into_iter()
                    .filter(|(date, _)| in_range(date))
                    .map(|(date, bar)| PricePoint::new(date, bar.adjusted_close))
                    .collect()
            }
            AssetClass::Crypto { base, market } => {
                let response: DigitalCurrencyResponse = self
                    .query(
                        &[
                            ("function", "DIGITAL_CURRENCY_DAILY"),
                            ("symbol", base.as_str()),
                            ("market", market.as_str()),
                        ],
                        CRYPTO_SERIES_KEY,
                    )
                    .await?;
                response
                    .time_series
                    .into_iter()
                    .filter(|(date, _)| in_range(date))
                    .map(|(date, bar)| PricePoint::new(date, bar.close))
                    .collect()
            }
        };

        let points: Vec<PricePoint> = points.into_iter().filter(|p| p.price.is_finite()).collect();
        debug!(symbol, points = points.len(), "fetched daily series");
        Ok(points)
    }

    pub async fn overview(&self, symbol: &str) -> Result<TickerMetadata, FetchError> {
        let overview: OverviewResponse = self
            .query(&[("function", "OVERVIEW"), ("symbol", symbol)], OVERVIEW_KEY)
            .await?;
        Ok(overview.into())
    }

    /// `data_key` is the field that marks a data reply. A body carrying it
    /// that does not decode is a `Decode` error rather than `NoData`.
    async fn query<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
        data_key: &str,
    ) -> Result<T, FetchError> {
        let url = format!("{}/query", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apikey", self.api_key.expose_secret())])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(FetchError::Api(error_msg));
        }

        let body = response.text().await?;
        let envelope: ProviderEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        match envelope {
            ProviderEnvelope::Data(data) => Ok(data),
            ProviderEnvelope::Error { error_message } => Err(FetchError::Api(error_message)),
            ProviderEnvelope::Limited { note } => Err(FetchError::RateLimited(note)),
            ProviderEnvelope::Other(value) if value.get(data_key).is_some() => {
                match serde_json::from_value::<T>(value) {
                    Ok(data) => Ok(data),
                    Err(e) => Err(FetchError::Decode(e.to_string())),
                }
            }
            ProviderEnvelope::Other(_) => Err(FetchError::NoData),
        }
    }
}
