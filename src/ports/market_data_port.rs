//! Market-data access port trait.

use crate::domain::error::DashError;
use crate::domain::ohlcv::DailyBar;
use crate::domain::period::PeriodCode;

/// A source of historical daily prices.
///
/// Implementations return bars for `symbol` covering `period`, oldest first.
/// Failures are returned as-is; callers decide how to surface them.
pub trait MarketDataPort {
    fn fetch_daily(&self, symbol: &str, period: PeriodCode) -> Result<Vec<DailyBar>, DashError>;
}
