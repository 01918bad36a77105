// src/matrix.rs

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        PricePoint { date, price }
    }
}

/// Adjusted closes, one row per trading date and one column per ticker.
///
/// Rows are the union of all column dates in ascending order. A cell is `None`
/// when that ticker has no quote on that date (a stock on a weekend next to a
/// crypto column, for instance). Every column holds at least one price.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceMatrix {
    dates: Vec<NaiveDate>,
    columns: IndexMap<String, Vec<Option<f64>>>,
}

impl PriceMatrix {
    /// Builds the matrix from per-ticker series. Empty series are dropped and
    /// a repeated ticker keeps its first series.
    pub fn from_series<I>(series: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<PricePoint>)>,
    {
        let mut by_symbol: IndexMap<String, BTreeMap<NaiveDate, f64>> = IndexMap::new();
        for (symbol, points) in series {
            if points.is_empty() || by_symbol.contains_key(&symbol) {
                continue;
            }
            by_symbol.insert(symbol, points.into_iter().map(|p| (p.date, p.price)).collect());
        }

        let dates: Vec<NaiveDate> = by_symbol
            .values()
            .flat_map(|prices| prices.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = by_symbol
            .into_iter()
            .map(|(symbol, prices)| {
                let column = dates.iter().map(|date| prices.get(date).copied()).collect();
                (symbol, column)
            })
            .collect();

        PriceMatrix { dates, columns }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.columns.get(symbol).map(Vec::as_slice)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.columns.iter().map(|(s, c)| (s.as_str(), c.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
