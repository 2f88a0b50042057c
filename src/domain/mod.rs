//! Core domain types and logic.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod locale;
pub mod ohlcv;
pub mod period;
pub mod selection;
pub mod table;
pub mod ticker;
