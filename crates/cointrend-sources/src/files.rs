//! CSV tables in the raw and processed data directories.

use std::fs::File;
use std::path::Path;

use cointrend_core::{RawInputs, SourceKind, SourceTable};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SourceError;

fn io_error(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn csv_error(path: &Path, source: csv::Error) -> SourceError {
    SourceError::Csv {
        path: path.display().to_string(),
        source,
    }
}

/// Reads every row of the CSV table at `path`, matching columns by header.
///
/// Extra columns are ignored and missing ones are left empty.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be opened and
/// [`SourceError::Csv`] if its structure cannot be read.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| csv_error(path, e))
}

/// Writes `rows` as a CSV table with a header row, creating parent
/// directories as needed. An existing file is replaced.
///
/// # Errors
///
/// Returns [`SourceError`] if the directory or file cannot be written.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), SourceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))?;
    Ok(())
}

fn load<T: DeserializeOwned>(dir: &Path, source: SourceKind) -> SourceTable<T> {
    let path = dir.join(source.raw_file_name());
    match read_table(&path) {
        Ok(rows) => {
            tracing::debug!(
                source = %source,
                rows = rows.len(),
                path = %path.display(),
                "loaded raw table"
            );
            Ok(rows)
        }
        Err(e) => {
            tracing::warn!(source = %source, error = %e, "raw table not loaded");
            Err(e.into())
        }
    }
}

/// Reads the six raw tables from `dir`, each independently.
///
/// A missing file yields an unavailable source and an unreadable one a
/// malformed source; neither affects the other tables.
#[must_use]
pub fn load_raw_inputs(dir: &Path) -> RawInputs {
    RawInputs {
        market: load(dir, SourceKind::Market),
        mentions: load(dir, SourceKind::Mentions),
        price_history: load(dir, SourceKind::PriceHistory),
        sentiment_index: load(dir, SourceKind::SentimentIndex),
        news: load(dir, SourceKind::News),
        tickers: load(dir, SourceKind::Tickers),
    }
}

#[cfg(test)]
mod tests {
    use cointrend_core::{RawMarketRow, RawPriceRow, SourceFailure};

    use super::*;

    #[test]
    fn reads_by_header_and_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coingecko_prices.csv");
        std::fs::write(
            &path,
            "id,symbol,name,image,current_price,price_change_percentage_24h\n\
             bitcoin,btc,Bitcoin,http://img,64000,2.5\n\
             tether,usdt,Tether,,1,\n",
        )
        .unwrap();

        let rows: Vec<RawMarketRow> = read_table(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name.as_deref(), Some("Bitcoin"));
        assert_eq!(rows[0].price_change_percentage_24h.as_deref(), Some("2.5"));
        assert_eq!(rows[1].price_change_percentage_24h, None);
        assert_eq!(rows[0].market_cap, None);
    }

    #[test]
    fn accepts_lowercase_price_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, "date,close\n2024-01-01,100\n").unwrap();

        let rows: Vec<RawPriceRow> = read_table(&path).unwrap();
        assert_eq!(rows[0].date.as_deref(), Some("2024-01-01"));
        assert_eq!(rows[0].close.as_deref(), Some("100"));
    }

    #[test]
    fn write_then_read_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/raw/yahoo_crypto.csv");
        let rows = vec![RawPriceRow {
            date: Some("2024-01-01 00:00:00+00:00".to_string()),
            close: Some("42000".to_string()),
            ..RawPriceRow::default()
        }];

        write_table(&path, &rows).unwrap();
        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("Date,Open,High,Low,Close,Volume"), "{header}");

        let back: Vec<RawPriceRow> = read_table(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn missing_dir_makes_every_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = load_raw_inputs(&dir.path().join("absent"));
        assert!(matches!(inputs.market, Err(SourceFailure::Unavailable(_))));
        assert!(matches!(inputs.tickers, Err(SourceFailure::Unavailable(_))));
    }

    #[test]
    fn ragged_file_is_malformed_without_affecting_others() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SourceKind::Tickers.raw_file_name()),
            "symbol,price\nBTCUSDT,1,extra\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(SourceKind::Mentions.raw_file_name()),
            "keyword,title\nbitcoin,hello\n",
        )
        .unwrap();

        let inputs = load_raw_inputs(dir.path());
        assert!(matches!(inputs.tickers, Err(SourceFailure::Malformed(_))));
        assert_eq!(inputs.mentions.unwrap().len(), 1);
        assert!(matches!(inputs.market, Err(SourceFailure::Unavailable(_))));
    }

    #[test]
    fn empty_file_is_an_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        let rows: Vec<RawMarketRow> = read_table(&path).unwrap();
        assert!(rows.is_empty());
    }
}
