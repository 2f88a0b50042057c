//! Lookback period selection.

use std::fmt;
use std::str::FromStr;

use chrono::Months;

use crate::domain::error::DashError;
use crate::domain::ohlcv::DailyBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PeriodCode {
    #[default]
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
}

impl PeriodCode {
    pub const ALL: [PeriodCode; 4] = [
        PeriodCode::FiveDays,
        PeriodCode::OneMonth,
        PeriodCode::ThreeMonths,
        PeriodCode::SixMonths,
    ];

    /// Code understood by the market-data source.
    pub fn fetch_code(self) -> &'static str {
        match self {
            PeriodCode::FiveDays => "5d",
            PeriodCode::OneMonth => "1mo",
            PeriodCode::ThreeMonths => "3mo",
            PeriodCode::SixMonths => "6mo",
        }
    }

    /// Label shown on the period selector.
    pub fn label(self) -> &'static str {
        match self {
            PeriodCode::FiveDays => "5days",
            PeriodCode::OneMonth => "1month",
            PeriodCode::ThreeMonths => "3months",
            PeriodCode::SixMonths => "6months",
        }
    }

    /// Day count used only in display text.
    pub fn display_days(self) -> u32 {
        match self {
            PeriodCode::FiveDays => 5,
            PeriodCode::OneMonth => 30,
            PeriodCode::ThreeMonths => 90,
            PeriodCode::SixMonths => 180,
        }
    }

    /// Restricts a daily series to this lookback window, measured back from
    /// the newest bar. `5d` means five trading days; the month periods are
    /// calendar months.
    pub fn trim(self, mut bars: Vec<DailyBar>) -> Vec<DailyBar> {
        bars.sort_by_key(|b| b.date);
        let Some(latest) = bars.last().map(|b| b.date) else {
            return bars;
        };

        let months = match self {
            PeriodCode::FiveDays => {
                let skip = bars.len().saturating_sub(5);
                return bars.split_off(skip);
            }
            PeriodCode::OneMonth => 1,
            PeriodCode::ThreeMonths => 3,
            PeriodCode::SixMonths => 6,
        };

        match latest.checked_sub_months(Months::new(months)) {
            Some(start) => bars.into_iter().filter(|b| b.date > start).collect(),
            None => bars,
        }
    }
}

impl fmt::Display for PeriodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fetch_code())
    }
}

impl FromStr for PeriodCode {
    type Err = DashError;

    /// Accepts either the fetch code (`1mo`) or the selector label (`1month`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PeriodCode::ALL
            .into_iter()
            .find(|p| p.fetch_code() == s || p.label() == s)
            .ok_or_else(|| DashError::InvalidPeriod { code: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(date: &str) -> DailyBar {
        DailyBar::flat(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), 100.0)
    }

    #[test]
    fn default_is_five_days() {
        assert_eq!(PeriodCode::default(), PeriodCode::FiveDays);
    }

    #[test]
    fn parses_codes_and_labels() {
        assert_eq!("5d".parse::<PeriodCode>().unwrap(), PeriodCode::FiveDays);
        assert_eq!("3months".parse::<PeriodCode>().unwrap(), PeriodCode::ThreeMonths);
        assert_eq!(" 6mo ".parse::<PeriodCode>().unwrap(), PeriodCode::SixMonths);
        assert!(matches!(
            "1y".parse::<PeriodCode>(),
            Err(DashError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn display_days_match_selector() {
        let days: Vec<u32> = PeriodCode::ALL.iter().map(|p| p.display_days()).collect();
        assert_eq!(days, vec![5, 30, 90, 180]);
    }

    #[test]
    fn trim_five_days_keeps_last_five_rows() {
        let bars = vec![
            bar("2024-01-08"),
            bar("2024-01-02"),
            bar("2024-01-03"),
            bar("2024-01-04"),
            bar("2024-01-05"),
            bar("2024-01-09"),
        ];
        let trimmed = PeriodCode::FiveDays.trim(bars);
        assert_eq!(trimmed.len(), 5);
        assert_eq!(trimmed[0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(trimmed[4].date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    }

    #[test]
    fn trim_one_month_is_calendar_window() {
        let bars = vec![bar("2024-01-15"), bar("2024-02-15"), bar("2024-02-16"), bar("2024-03-15")];
        let trimmed = PeriodCode::OneMonth.trim(bars);
        let dates: Vec<String> = trimmed.iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-02-16", "2024-03-15"]);
    }

    #[test]
    fn trim_empty_series() {
        assert!(PeriodCode::SixMonths.trim(Vec::new()).is_empty());
    }
}
