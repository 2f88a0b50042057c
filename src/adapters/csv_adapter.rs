//! CSV directory market-data adapter.
//!
//! Reads `{dir}/{SYMBOL}.csv` files in the layout of a Yahoo Finance history
//! export (`Date,Open,High,Low,Close,Adj Close,Volume`). Columns are matched
//! by header name, so `Adj Close` and column order do not matter. Rows with
//! a `null` or blank close are skipped.

use crate::domain::error::DashError;
use crate::domain::ohlcv::DailyBar;
use crate::domain::period::PeriodCode;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    volume: Option<usize>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Every bar in the file, oldest first.
    pub fn read_all(&self, symbol: &str) -> Result<Vec<DailyBar>, DashError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| DashError::Fetch {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let malformed = |reason: String| DashError::MalformedData {
            symbol: symbol.to_string(),
            reason,
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| malformed(format!("CSV header error: {}", e)))?
            .clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let columns = Columns {
            date: find("date").ok_or_else(|| malformed("missing Date column".into()))?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            close: find("close").ok_or_else(|| malformed("missing Close column".into()))?,
            volume: find("volume"),
        };

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| malformed(format!("CSV parse error: {}", e)))?;

            let Some(close) = parse_price(record.get(columns.close))
                .map_err(|e| malformed(format!("invalid close value: {}", e)))?
            else {
                continue;
            };

            let date_str = record.get(columns.date).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| malformed(format!("invalid date '{}': {}", date_str, e)))?;

            let field = |col: Option<usize>| -> Result<f64, DashError> {
                let raw = col.and_then(|c| record.get(c));
                Ok(parse_price(raw)
                    .map_err(|e| malformed(format!("invalid price value: {}", e)))?
                    .unwrap_or(close))
            };

            let volume = columns
                .volume
                .and_then(|c| record.get(c))
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != "null")
                .map(|v| v.parse::<f64>().map(|f| f.max(0.0) as u64))
                .transpose()
                .map_err(|e| malformed(format!("invalid volume value: {}", e)))?
                .unwrap_or(0);

            bars.push(DailyBar {
                date,
                open: field(columns.open)?,
                high: field(columns.high)?,
                low: field(columns.low)?,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn parse_price(raw: Option<&str>) -> Result<Option<f64>, std::num::ParseFloatError> {
    match raw.map(str::trim) {
        None | Some("") | Some("null") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_daily(&self, symbol: &str, period: PeriodCode) -> Result<Vec<DailyBar>, DashError> {
        Ok(period.trim(self.read_all(symbol)?))
    }
}
