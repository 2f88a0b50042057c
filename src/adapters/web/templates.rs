//! HTML templates using Askama.
//!
//! Templates receive a pre-formatted [`DashboardView`]; all number and date
//! formatting happens here so the markup stays logic-free.

use askama::Template;

use super::WebError;
use crate::adapters::chart_svg::generate_price_svg;
use crate::domain::dashboard::{Body, Dashboard, RenderOutput};
use crate::domain::period::PeriodCode;
use crate::domain::selection::{PRICE_CEILING, PRICE_FLOOR, Selection};
use crate::domain::table::{COMPANY_COLUMN, WideTable};

pub struct PeriodOption {
    pub code: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

pub struct CompanyOption {
    pub name: String,
    pub checked: bool,
}

pub struct TableRowView {
    pub company: String,
    pub cells: Vec<String>,
}

pub struct TableView {
    pub name_header: &'static str,
    pub dates: Vec<String>,
    pub rows: Vec<TableRowView>,
}

impl TableView {
    pub fn from_table(table: &WideTable) -> Self {
        Self {
            name_header: COMPANY_COLUMN,
            dates: table
                .dates()
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
            rows: table
                .rows()
                .iter()
                .map(|row| TableRowView {
                    company: row.company.clone(),
                    cells: row
                        .cells
                        .iter()
                        .map(|c| c.map(|v| format!("{:.2}", v)).unwrap_or_default())
                        .collect(),
                })
                .collect(),
        }
    }
}

pub struct MessageView {
    pub text: &'static str,
    /// `warning` for the empty selection, `error` for failures.
    pub class: &'static str,
}

pub struct DashboardView {
    pub lang: &'static str,
    pub title: String,
    pub caption: String,
    pub sidebar_heading: &'static str,
    pub sidebar_intro: &'static str,
    pub period_heading: &'static str,
    pub period_label: &'static str,
    pub range_heading: &'static str,
    pub range_label: &'static str,
    pub companies_label: &'static str,
    pub table_heading: &'static str,
    pub submit: &'static str,
    pub periods: Vec<PeriodOption>,
    pub ymin: String,
    pub ymax: String,
    pub floor: String,
    pub ceiling: String,
    pub companies: Vec<CompanyOption>,
    pub message: Option<MessageView>,
    pub table: Option<TableView>,
    pub chart_svg: Option<String>,
    pub chart_json_url: String,
}

impl DashboardView {
    pub fn build(
        dashboard: &Dashboard,
        selection: &Selection,
        output: &RenderOutput,
        raw_query: Option<&str>,
    ) -> Self {
        let locale = dashboard.locale();
        let texts = locale.texts();

        let (message, table, chart_svg) = match &output.body {
            Body::Chart(panel) => (
                None,
                Some(TableView::from_table(&panel.table)),
                Some(generate_price_svg(&panel.chart)),
            ),
            Body::Message(notice) => (
                Some(MessageView {
                    text: notice.text(locale),
                    class: if notice.is_failure() { "error" } else { "warning" },
                }),
                None,
                None,
            ),
        };

        Self {
            lang: locale.code(),
            title: output.header.title.clone(),
            caption: output.header.caption.clone(),
            sidebar_heading: texts.sidebar_heading,
            sidebar_intro: texts.sidebar_intro,
            period_heading: texts.period_heading,
            period_label: texts.period_label,
            range_heading: texts.range_heading,
            range_label: texts.range_label,
            companies_label: texts.companies_label,
            table_heading: texts.table_heading,
            submit: texts.submit,
            periods: PeriodCode::ALL
                .into_iter()
                .map(|p| PeriodOption {
                    code: p.fetch_code(),
                    label: p.label(),
                    checked: p == selection.period,
                })
                .collect(),
            ymin: format!("{}", selection.price_range.min()),
            ymax: format!("{}", selection.price_range.max()),
            floor: format!("{}", PRICE_FLOOR),
            ceiling: format!("{}", PRICE_CEILING),
            companies: dashboard
                .tickers()
                .names()
                .map(|name| CompanyOption {
                    name: name.to_string(),
                    checked: selection.companies().iter().any(|c| c == name),
                })
                .collect(),
            message,
            table,
            chart_svg,
            chart_json_url: match raw_query {
                Some(q) if !q.is_empty() => format!("/chart.json?{q}"),
                _ => "/chart.json".to_string(),
            },
        }
    }
}

/// Full page.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub page: &'a DashboardView,
}

/// The `#content` block only, for HTMX swaps.
#[derive(Template)]
#[template(path = "dashboard_content.html")]
pub struct DashboardFragment<'a> {
    pub page: &'a DashboardView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub lang: &'static str,
    pub heading: &'static str,
    pub back_link: &'static str,
    pub message: &'a str,
    pub status: u16,
}

impl<'a> ErrorTemplate<'a> {
    pub fn new(err: &'a WebError) -> Self {
        let texts = err.locale.texts();
        Self {
            lang: err.locale.code(),
            heading: texts.error_heading,
            back_link: texts.back_link,
            message: &err.message,
            status: err.status.as_u16(),
        }
    }

    /// The `#error` block only, for HTMX swaps.
    pub fn fragment(&self) -> String {
        format!(
            "<div id=\"error\" class=\"error\"><h1>{} {}</h1><p>{}</p></div>",
            self.heading, self.status, self.message
        )
    }
}
