//! Yahoo Finance chart-API market-data adapter.

use std::time::Duration;

use chrono::DateTime;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::error::DashError;
use crate::domain::ohlcv::DailyBar;
use crate::domain::period::PeriodCode;
use crate::ports::market_data_port::MarketDataPort;

// The chart endpoint rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

pub struct YahooAdapter {
    client: Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DashError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DashError::Fetch {
                symbol: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

impl MarketDataPort for YahooAdapter {
    fn fetch_daily(&self, symbol: &str, period: PeriodCode) -> Result<Vec<DailyBar>, DashError> {
        let fetch_err = |reason: String| DashError::Fetch {
            symbol: symbol.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(self.chart_url(symbol))
            .query(&[("range", period.fetch_code()), ("interval", "1d")])
            .send()
            .map_err(|e| fetch_err(format!("request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| fetch_err(format!("failed to read response: {e}")))?;

        // Unknown symbols come back as 404 with a JSON error body.
        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_str::<ChartResponse>(&body) {
                if let Some(err) = parsed.chart.error {
                    return Err(fetch_err(format!("{}: {}", err.code, err.description)));
                }
            }
            return Err(fetch_err(format!("request failed with status {status}")));
        }

        let bars = parse_chart_response(symbol, &body)?;
        tracing::debug!(symbol, %period, bars = bars.len(), "received chart data");
        Ok(bars)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Decodes a chart-API body into daily bars, oldest first.
///
/// Timestamps are shifted by the exchange's GMT offset before taking the
/// date, so a US session maps to its local trading day. Days without a
/// close are dropped.
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<Vec<DailyBar>, DashError> {
    let malformed = |reason: String| DashError::MalformedData {
        symbol: symbol.to_string(),
        reason,
    };

    let parsed: ChartResponse =
        serde_json::from_str(body).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

    if let Some(err) = parsed.chart.error {
        return Err(DashError::Fetch {
            symbol: symbol.to_string(),
            reason: format!("{}: {}", err.code, err.description),
        });
    }

    let result = parsed
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| malformed("response has no result".into()))?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    if quote.close.len() != result.timestamp.len() {
        return Err(malformed(format!(
            "{} timestamps but {} closes",
            result.timestamp.len(),
            quote.close.len()
        )));
    }

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close[i] else {
            continue;
        };
        let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)
            .ok_or_else(|| malformed(format!("timestamp {ts} out of range")))?
            .date_naive();
        let field = |values: &[Option<f64>]| values.get(i).copied().flatten().unwrap_or(close);
        bars.push(DailyBar {
            date,
            open: field(&quote.open),
            high: field(&quote.high),
            low: field(&quote.low),
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    Ok(bars)
}
