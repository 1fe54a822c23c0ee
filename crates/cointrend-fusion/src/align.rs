//! Date alignment of two independently sourced series.

use std::collections::HashMap;

use chrono::NaiveDate;
use cointrend_core::{MarketSentimentRow, NewsArticle, PricePoint, SentimentPoint};

/// A row carrying the UTC calendar date it is joined on.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for PricePoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for SentimentPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for NewsArticle {
    fn date(&self) -> NaiveDate {
        NewsArticle::date(self)
    }
}

/// Left outer join of `secondary` onto `primary` by date.
///
/// Every primary row appears in primary order. A primary row with no dated
/// match is paired with `None`; one with several matches is emitted once per
/// match, in secondary order.
#[must_use]
pub fn align<'a, P: Dated, S: Dated>(
    primary: &'a [P],
    secondary: &'a [S],
) -> Vec<(&'a P, Option<&'a S>)> {
    let mut by_date: HashMap<NaiveDate, Vec<&S>> = HashMap::new();
    for row in secondary {
        by_date.entry(row.date()).or_default().push(row);
    }

    let mut out = Vec::with_capacity(primary.len());
    for row in primary {
        match by_date.get(&row.date()) {
            Some(matches) => out.extend(matches.iter().map(|m| (row, Some(*m)))),
            None => out.push((row, None)),
        }
    }
    out
}

/// Price history left-joined with the sentiment index, flattened for storage.
#[must_use]
pub fn align_market_sentiment(
    prices: &[PricePoint],
    sentiment: &[SentimentPoint],
) -> Vec<MarketSentimentRow> {
    align(prices, sentiment)
        .into_iter()
        .map(|(price, reading)| MarketSentimentRow::new(price, reading))
        .collect()
}
