// src/lib.rs

pub mod catalog;
pub mod client;
pub mod fetcher;
pub mod matrix;
pub mod models;

pub use catalog::{Catalog, CatalogEntry, CatalogError, Category};
pub use client::{AssetClass, FetchError, QuoteClient, DEFAULT_BASE_URL};
pub use fetcher::{FetchKey, FetchOutcome, FetchRequestError, MissingTicker, PriceSeriesFetcher};
pub use matrix::{PriceMatrix, PricePoint};
pub use models::TickerMetadata;
