//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Json,
    extract::{Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::domain::dashboard::{Body, Notice, RenderOutput};
use crate::domain::locale::Locale;
use crate::domain::period::PeriodCode;
use crate::domain::selection::{
    DEFAULT_COMPANIES, PRICE_CEILING, PRICE_FLOOR, PriceRange, Selection,
};

use super::templates::{DashboardFragment, DashboardTemplate, DashboardView, ErrorTemplate};
use super::{AppState, WebError, is_htmx_request};

/// Control state as submitted by the dashboard form.
///
/// `company` may repeat. `submitted` marks a form post, so that an empty
/// company list means "none selected" rather than "first visit".
#[derive(Debug, Default, PartialEq)]
pub struct DashboardQuery {
    pub period: Option<String>,
    pub ymin: Option<String>,
    pub ymax: Option<String>,
    pub companies: Vec<String>,
    pub submitted: bool,
}

impl DashboardQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "period" => query.period = Some(value),
                "ymin" => query.ymin = Some(value),
                "ymax" => query.ymax = Some(value),
                "company" => query.companies.push(value),
                "submitted" => query.submitted = true,
                _ => {}
            }
        }
        query
    }

    /// Bounds given in either order are accepted, like the two handles of
    /// a range slider. Only unparsable values are rejected.
    pub fn into_selection(self, locale: Locale) -> Result<Selection, WebError> {
        let invalid = locale.texts().bad_request;
        let period = match self.period.as_deref() {
            Some(code) => code
                .parse::<PeriodCode>()
                .map_err(|_| WebError::bad_request(format!("{invalid}: period '{code}'")))?,
            None => PeriodCode::default(),
        };

        let bound = |name: &str, raw: Option<&str>, default: f64| -> Result<f64, WebError> {
            match raw.map(str::trim) {
                None | Some("") => Ok(default),
                Some(v) => v
                    .parse::<f64>()
                    .ok()
                    .filter(|x| !x.is_nan())
                    .ok_or_else(|| WebError::bad_request(format!("{invalid}: {name} '{v}'"))),
            }
        };
        let a = bound("ymin", self.ymin.as_deref(), PRICE_FLOOR)?;
        let b = bound("ymax", self.ymax.as_deref(), PRICE_CEILING)?;
        let price_range = PriceRange::new(a.min(b), a.max(b))?;

        if self.companies.is_empty() && !self.submitted {
            return Ok(Selection::new(period, price_range, DEFAULT_COMPANIES));
        }
        Ok(Selection::new(period, price_range, self.companies))
    }
}

async fn render_pass(
    state: &Arc<AppState>,
    selection: Selection,
) -> Result<RenderOutput, WebError> {
    let dashboard = Arc::clone(&state.dashboard);
    tokio::task::spawn_blocking(move || dashboard.render(&selection))
        .await
        .map_err(|e| WebError::internal(format!("render task failed: {e}")))
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let locale = state.dashboard.locale();
    dashboard_page(&state, &headers, raw_query.as_deref(), pairs)
        .await
        .map_err(|e| e.with_locale(locale))
}

async fn dashboard_page(
    state: &Arc<AppState>,
    headers: &HeaderMap,
    raw_query: Option<&str>,
    pairs: Vec<(String, String)>,
) -> Result<Response, WebError> {
    let selection = DashboardQuery::from_pairs(pairs).into_selection(state.dashboard.locale())?;
    tracing::debug!(
        period = %selection.period,
        companies = ?selection.companies(),
        "dashboard request"
    );
    let output = render_pass(state, selection.clone()).await?;
    let view = DashboardView::build(&state.dashboard, &selection, &output, raw_query);

    let html = if is_htmx_request(headers) {
        DashboardFragment { page: &view }.render()?
    } else {
        DashboardTemplate { page: &view }.render()?
    };
    Ok(Html(html).into_response())
}

/// Vega-Lite document for the current selection.
pub async fn chart_json(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let locale = state.dashboard.locale();
    let selection = DashboardQuery::from_pairs(pairs)
        .into_selection(locale)
        .map_err(|e| e.with_locale(locale))?;
    let output = render_pass(&state, selection)
        .await
        .map_err(|e| e.with_locale(locale))?;

    let response = match &output.body {
        Body::Chart(panel) => Json(panel.chart.to_vega_lite()).into_response(),
        Body::Message(notice) => {
            let status = match notice {
                Notice::EmptySelection => StatusCode::UNPROCESSABLE_ENTITY,
                Notice::Failure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": notice.text(locale) }))).into_response()
        }
    };
    Ok(response)
}

pub async fn not_found(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let locale = state.dashboard.locale();
    let err = WebError::not_found(locale.texts().not_found).with_locale(locale);
    if is_htmx_request(&headers) {
        let template = ErrorTemplate::new(&err);
        return (err.status, Html(template.fragment())).into_response();
    }
    err.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_visit_uses_defaults() {
        let selection = DashboardQuery::from_pairs(Vec::new()).into_selection(Locale::En).unwrap();
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn submitted_form_without_companies_is_empty() {
        let query = DashboardQuery::from_pairs(pairs(&[("period", "1mo"), ("submitted", "1")]));
        let selection = query.into_selection(Locale::En).unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.period, PeriodCode::OneMonth);
    }

    #[test]
    fn repeated_company_keys_collect_in_order() {
        let query = DashboardQuery::from_pairs(pairs(&[
            ("company", "netflix"),
            ("ymin", "100"),
            ("company", "apple"),
            ("ymax", "900.5"),
            ("company", "netflix"),
        ]));
        assert_eq!(query.companies, vec!["netflix", "apple", "netflix"]);
        let selection = query.into_selection(Locale::En).unwrap();
        assert_eq!(selection.companies(), &["netflix", "apple"]);
        assert_eq!(selection.price_range, PriceRange::new(100.0, 900.5).unwrap());
    }

    #[test]
    fn bad_parameters_are_rejected() {
        for bad in [
            pairs(&[("period", "10y")]),
            pairs(&[("ymin", "cheap")]),
            pairs(&[("ymin", "NaN")]),
        ] {
            let err = DashboardQuery::from_pairs(bad).into_selection(Locale::En).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn inverted_bounds_are_reordered() {
        let query = DashboardQuery::from_pairs(pairs(&[
            ("ymin", "500"),
            ("ymax", "100"),
            ("company", "apple"),
            ("submitted", "1"),
        ]));
        let selection = query.into_selection(Locale::En).unwrap();
        assert_eq!(selection.price_range, PriceRange::new(100.0, 500.0).unwrap());
    }

    #[test]
    fn rejection_message_follows_locale() {
        let err = DashboardQuery::from_pairs(pairs(&[("period", "2y")]))
            .into_selection(Locale::Ja)
            .unwrap_err();
        assert!(err.message.starts_with(Locale::Ja.texts().bad_request));
    }
}
