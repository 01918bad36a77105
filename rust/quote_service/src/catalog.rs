// src/catalog.rs
//
// Selectable tickers grouped into Stocks, ETFs and Crypto. The catalog is a
// TOML document with one array of tables per category:
//
//   [[stocks]]
//   symbol = "AAPL"
//   name = "Apple Inc."
//
// A default document is compiled in; a file can replace it at startup.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidationErrors};

pub const DEFAULT_CATALOG: &str = include_str!("../catalog.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid catalog document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid catalog entry {symbol:?}: {source}")]
    Invalid {
        symbol: String,
        source: ValidationErrors,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Stocks,
    #[serde(rename = "ETFs")]
    Etfs,
    Crypto,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
struct SourceEntry {
    #[validate(length(min = 1, max = 15))]
    symbol: String,
    #[validate(length(min = 1, max = 100))]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogSource {
    #[serde(default)]
    stocks: Vec<SourceEntry>,
    #[serde(default)]
    etfs: Vec<SourceEntry>,
    #[serde(default)]
    crypto: Vec<SourceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub display_name: String,
    pub category: Category,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: IndexMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_toml_str(DEFAULT_CATALOG)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parses and normalizes a catalog document.
    ///
    /// Symbols are trimmed and upper-cased; a symbol listed twice keeps its
    /// first category.
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let source: CatalogSource = toml::from_str(raw)?;

        let groups = [
            (Category::Stocks, source.stocks),
            (Category::Etfs, source.etfs),
            (Category::Crypto, source.crypto),
        ];

        let mut entries = IndexMap::new();
        for (category, group) in groups {
            for entry in group {
                let entry = SourceEntry {
                    symbol: entry.symbol.trim().to_uppercase(),
                    name: entry.name.trim().to_string(),
                };
                entry.validate().map_err(|source| CatalogError::Invalid {
                    symbol: entry.symbol.clone(),
                    source,
                })?;

                if entries.contains_key(&entry.symbol) {
                    debug!(symbol = %entry.symbol, ?category, "duplicate catalog symbol ignored");
                    continue;
                }
                entries.insert(
                    entry.symbol,
                    CatalogEntry {
                        display_name: entry.name,
                        category,
                    },
                );
            }
        }

        Ok(Catalog { entries })
    }

    /// Every selectable symbol with its display name and category.
    pub fn list_catalog(&self) -> &IndexMap<String, CatalogEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
