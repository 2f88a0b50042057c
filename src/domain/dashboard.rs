//! One render pass of the dashboard.
//!
//! [`Dashboard::render`] is invoked once per UI interaction with the current
//! [`Selection`]. It always produces a header plus exactly one body: the
//! chart panel, or a message. The data pipeline returns a `Result` and this
//! module is the only place that turns a failure into the generic message.

use std::sync::Arc;

use crate::domain::chart::{self, ChartSpec};
use crate::domain::error::DashError;
use crate::domain::fetcher::ClosingPriceFetcher;
use crate::domain::locale::Locale;
use crate::domain::selection::Selection;
use crate::domain::table::{self, TidyTable, WideTable};
use crate::domain::ticker::TickerMap;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub title: String,
    pub caption: String,
}

#[derive(Debug)]
pub enum Notice {
    /// No company selected. Expected, not a failure.
    EmptySelection,
    /// Anything went wrong. `cause` is for diagnostics only.
    Failure { cause: DashError },
}

impl Notice {
    pub fn text(&self, locale: Locale) -> &'static str {
        match self {
            Notice::EmptySelection => locale.texts().empty_selection,
            Notice::Failure { .. } => locale.texts().failure,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Notice::Failure { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ChartPanel {
    /// Selected rows, sorted by company name.
    pub table: WideTable,
    pub tidy: TidyTable,
    pub chart: ChartSpec,
}

#[derive(Debug)]
pub enum Body {
    Chart(ChartPanel),
    Message(Notice),
}

#[derive(Debug)]
pub struct RenderOutput {
    pub header: Header,
    pub body: Body,
}

impl RenderOutput {
    pub fn panel(&self) -> Option<&ChartPanel> {
        match &self.body {
            Body::Chart(panel) => Some(panel),
            Body::Message(_) => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match &self.body {
            Body::Message(notice) => Some(notice),
            Body::Chart(_) => None,
        }
    }
}

pub struct Dashboard {
    tickers: TickerMap,
    fetcher: ClosingPriceFetcher,
    locale: Locale,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn MarketDataPort + Send + Sync>,
        tickers: TickerMap,
        locale: Locale,
    ) -> Self {
        Self {
            tickers,
            fetcher: ClosingPriceFetcher::new(source),
            locale,
        }
    }

    pub fn tickers(&self) -> &TickerMap {
        &self.tickers
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn header(&self, selection: &Selection) -> Header {
        Header {
            title: self.locale.texts().title.to_string(),
            caption: self.locale.period_caption(selection.period.display_days()),
        }
    }

    pub fn render(&self, selection: &Selection) -> RenderOutput {
        let header = self.header(selection);

        if selection.is_empty() {
            return RenderOutput {
                header,
                body: Body::Message(Notice::EmptySelection),
            };
        }

        let body = match self.build_panel(selection) {
            Ok(panel) => Body::Chart(panel),
            Err(cause) => {
                tracing::warn!(error = %cause, period = %selection.period, "render pass failed");
                Body::Message(Notice::Failure { cause })
            }
        };
        RenderOutput { header, body }
    }

    /// fetch → select → sort → reshape → chart.
    pub fn build_panel(&self, selection: &Selection) -> Result<ChartPanel, DashError> {
        let fetched = self.fetcher.fetch(selection.period, &self.tickers)?;
        let subset = fetched.select(selection.companies())?;
        let tidy = table::reshape(&subset);
        let chart = chart::render(&tidy, selection.price_range);
        Ok(ChartPanel {
            table: subset.sorted_by_name(),
            tidy,
            chart,
        })
    }
}
