//! Closing-price fetcher with a per-instance memo cache.

use std::sync::{Arc, Mutex};

use crate::domain::error::DashError;
use crate::domain::period::PeriodCode;
use crate::domain::table::WideTable;
use crate::domain::ticker::TickerMap;
use crate::ports::market_data_port::MarketDataPort;

type CacheKey = (PeriodCode, TickerMap);

/// Memoized fetch results keyed on `(period, ticker map)`.
///
/// Holds at most `capacity` tables; the oldest entry is evicted first.
#[derive(Debug)]
pub struct FetchCache {
    capacity: usize,
    entries: Vec<(CacheKey, Arc<WideTable>)>,
}

impl FetchCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    fn get(&self, period: PeriodCode, tickers: &TickerMap) -> Option<Arc<WideTable>> {
        self.entries
            .iter()
            .find(|((p, t), _)| *p == period && t == tickers)
            .map(|(_, table)| Arc::clone(table))
    }

    fn insert(&mut self, period: PeriodCode, tickers: &TickerMap, table: Arc<WideTable>) {
        self.entries
            .retain(|((p, t), _)| !(*p == period && t == tickers));
        if self.entries.len() >= self.capacity {
            self.entries.remove(0);
        }
        self.entries.push(((period, tickers.clone()), table));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FetchCache {
    /// One slot per period code.
    fn default() -> Self {
        Self::new(PeriodCode::ALL.len())
    }
}

pub struct ClosingPriceFetcher {
    source: Arc<dyn MarketDataPort + Send + Sync>,
    cache: Mutex<FetchCache>,
}

impl ClosingPriceFetcher {
    pub fn new(source: Arc<dyn MarketDataPort + Send + Sync>) -> Self {
        Self {
            source,
            cache: Mutex::new(FetchCache::default()),
        }
    }

    /// Builds the company × date table of closing prices for `period`.
    ///
    /// Rows follow `tickers` order. Served from cache when the same
    /// `(period, tickers)` pair was fetched before. Any port failure aborts
    /// the whole fetch and nothing is cached.
    pub fn fetch(
        &self,
        period: PeriodCode,
        tickers: &TickerMap,
    ) -> Result<Arc<WideTable>, DashError> {
        if let Some(table) = self.lock_cache().get(period, tickers) {
            tracing::debug!(%period, "price table served from cache");
            return Ok(table);
        }

        let mut series = Vec::with_capacity(tickers.len());
        for (company, symbol) in tickers.iter() {
            tracing::info!(%period, company, symbol, "fetching daily prices");
            let bars = self.source.fetch_daily(symbol, period)?;
            if bars.is_empty() {
                return Err(DashError::NoData {
                    symbol: symbol.to_string(),
                });
            }
            let closes = bars.into_iter().map(|b| (b.date, b.close)).collect();
            series.push((company.to_string(), closes));
        }

        let table = Arc::new(WideTable::from_series(series)?);
        self.lock_cache().insert(period, tickers, Arc::clone(&table));
        Ok(table)
    }

    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, FetchCache> {
        // Entries are immutable Arcs, so a poisoned cache is still consistent.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
