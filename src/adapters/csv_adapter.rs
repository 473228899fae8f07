//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row naming
//! `Date,Open,High,Low,Close,Volume` in any order and case. Other columns
//! (e.g. `Adj Close`) are ignored. Empty numeric cells load as NaN.

use crate::domain::error::StockcastError;
use crate::domain::price_bar::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_err(reason: String) -> StockcastError {
    StockcastError::Data { reason }
}

fn parse_number(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, StockcastError> {
    let raw = record.get(idx).unwrap_or("").trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return Ok(f64::NAN);
    }
    raw.parse()
        .map_err(|e| data_err(format!("invalid {} value '{}': {}", name, raw, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, StockcastError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(StockcastError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_err(format!("CSV header error: {}", e)))?
            .clone();

        let mut idx = [0usize; 6];
        for (slot, name) in idx.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| data_err(format!("missing {} column", name)))?;
        }
        let [date_idx, open_idx, high_idx, low_idx, close_idx, volume_idx] = idx;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;

            let date_str = record.get(date_idx).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| data_err(format!("invalid date '{}': {}", date_str, e)))?;

            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: parse_number(&record, open_idx, "open")?,
                high: parse_number(&record, high_idx, "high")?,
                low: parse_number(&record, low_idx, "low")?,
                close: parse_number(&record, close_idx, "close")?,
                volume: parse_number(&record, volume_idx, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        if let Some(dup) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(data_err(format!(
                "duplicate date {} in {}",
                dup[0].date,
                path.display()
            )));
        }

        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded price bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockcastError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_err(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_err(format!("directory entry error: {}", e)))?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
