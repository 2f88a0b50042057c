#![allow(dead_code)]

use chrono::NaiveDate;
use pricedash::domain::error::DashError;
pub use pricedash::domain::ohlcv::DailyBar;
use pricedash::domain::period::PeriodCode;
use pricedash::domain::ticker::TickerMap;
use pricedash::ports::market_data_port::MarketDataPort;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory market data keyed by ticker symbol.
pub struct MockMarketData {
    pub data: HashMap<String, Vec<DailyBar>>,
    pub errors: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<DailyBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_daily(&self, symbol: &str, period: PeriodCode) -> Result<Vec<DailyBar>, DashError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DashError::Fetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(period.trim(self.data.get(symbol).cloned().unwrap_or_default()))
    }
}

/// Six tickers with five weekday closes each, starting 2024-03-04.
pub fn gafa_market() -> MockMarketData {
    let mut market = MockMarketData::new();
    for (i, (_, symbol)) in TickerMap::gafa().iter().enumerate() {
        let bars = generate_bars("2024-03-04", 5, 100.0 * (i + 1) as f64);
        market = market.with_bars(symbol, bars);
    }
    market
}

pub fn make_bar(date: &str, close: f64) -> DailyBar {
    DailyBar::flat(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), close)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<DailyBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| DailyBar {
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000,
        })
        .collect()
}
