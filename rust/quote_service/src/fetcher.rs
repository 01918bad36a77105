// src/fetcher.rs

use crate::client::{FetchError, QuoteClient};
use crate::matrix::PriceMatrix;
use crate::models::TickerMetadata;
use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchRequestError {
    #[error("no tickers selected")]
    NoTickers,

    #[error("empty date range: {start} to {end}")]
    EmptyDateRange { start: NaiveDate, end: NaiveDate },
}

/// Memo key: the exact tickers (in request order) and date range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug)]
pub struct MissingTicker {
    pub symbol: String,
    pub error: FetchError,
}

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub matrix: PriceMatrix,
    pub missing: Vec<MissingTicker>,
}

impl FetchOutcome {
    fn is_cacheable(&self) -> bool {
        !self.missing.iter().any(|m| m.error.is_transient())
    }
}

/// Fetches price matrices and fundamentals and memoizes them for the life of
/// the process.
pub struct PriceSeriesFetcher {
    client: Arc<QuoteClient>,
    cache: DashMap<FetchKey, Arc<FetchOutcome>>,
    metadata: DashMap<String, TickerMetadata>,
}

impl PriceSeriesFetcher {
    pub fn new(client: Arc<QuoteClient>) -> Self {
        PriceSeriesFetcher {
            client,
            cache: DashMap::new(),
            metadata: DashMap::new(),
        }
    }

    /// Returns the matrix for `tickers` over `[start, end)`.
    ///
    /// Tickers that fail or have no data in range are left out of the matrix
    /// and reported in [`FetchOutcome::missing`]. Outcomes are cached unless a
    /// ticker failed for a transient reason.
    pub async fn fetch(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Arc<FetchOutcome>, FetchRequestError> {
        if tickers.is_empty() {
            return Err(FetchRequestError::NoTickers);
        }
        if start >= end {
            return Err(FetchRequestError::EmptyDateRange { start, end });
        }

        let key = FetchKey {
            tickers: tickers.to_vec(),
            start,
            end,
        };

        let cached = self.cache.get(&key).map(|entry| Arc::clone(entry.value()));
        if let Some(outcome) = cached {
            debug!(?tickers, %start, %end, "price cache hit");
            return Ok(outcome);
        }

        let mut series = Vec::with_capacity(tickers.len());
        let mut missing = Vec::new();

        for symbol in tickers {
            match self.client.daily_series(symbol, start, end).await {
                Ok(points) if !points.is_empty() => series.push((symbol.clone(), points)),
                Ok(_) => {
                    warn!(symbol = %symbol, "no price data in range, dropping ticker");
                    missing.push(MissingTicker {
                        symbol: symbol.clone(),
                        error: FetchError::NoData,
                    });
                }
                Err(error) => {
                    warn!(symbol = %symbol, %error, "price fetch failed, dropping ticker");
                    missing.push(MissingTicker {
                        symbol: symbol.clone(),
                        error,
                    });
                }
            }
        }

        let outcome = Arc::new(FetchOutcome {
            matrix: PriceMatrix::from_series(series),
            missing,
        });

        if outcome.is_cacheable() {
            self.cache.insert(key, Arc::clone(&outcome));
        } else {
            info!(?tickers, "not caching price outcome with transient failures");
        }

        Ok(outcome)
    }

    /// Fundamentals for `symbol`. A reply with no fundamentals is remembered
    /// as all-absent; transport and rate-limit failures are not remembered.
    pub async fn metadata(&self, symbol: &str) -> Result<TickerMetadata, FetchError> {
        let cached = self.metadata.get(symbol).map(|entry| entry.value().clone());
        if let Some(metadata) = cached {
            debug!(symbol = %symbol, "metadata cache hit");
            return Ok(metadata);
        }

        let metadata = match self.client.overview(symbol).await {
            Ok(metadata) => metadata,
            Err(FetchError::NoData) => TickerMetadata::default(),
            Err(error) => return Err(error),
        };
        self.metadata.insert(symbol.to_string(), metadata.clone());
        Ok(metadata)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}
