//! Line chart description built from a tidy price table.
//!
//! [`ChartSpec`] is renderer-agnostic. [`ChartSpec::to_vega_lite`] produces a
//! Vega-Lite document for browser rendering; the SVG adapter draws the same
//! description server-side.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::domain::selection::PriceRange;
use crate::domain::table::{COMPANY_COLUMN, DATE_COLUMN, PRICE_COLUMN, TidyRow, TidyTable};

pub const LINE_OPACITY: f64 = 0.8;

/// Vega's default categorical palette.
const CATEGORY10: [&str; 10] = [
    "#4c78a8", "#f58518", "#e45756", "#72b7b2", "#54a24b", "#eeca3b", "#b279a2", "#ff9da6",
    "#9d755d", "#bab0ac",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub company: String,
    pub color: &'static str,
    /// Sorted by date.
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// One line per company, sorted by company name.
    pub series: Vec<Series>,
    /// Fixed value-axis domain.
    pub y_domain: (f64, f64),
    /// Data-driven time-axis domain; `None` when there is no data.
    pub x_domain: Option<(NaiveDate, NaiveDate)>,
    pub opacity: f64,
    pub clip: bool,
    values: Vec<TidyRow>,
}

impl ChartSpec {
    pub fn line_count(&self) -> usize {
        self.series.len()
    }

    pub fn to_vega_lite(&self) -> Value {
        let values: Vec<Value> = self
            .values
            .iter()
            .map(|r| {
                json!({
                    DATE_COLUMN: r.date.format("%Y-%m-%d").to_string(),
                    COMPANY_COLUMN: r.company,
                    PRICE_COLUMN: r.price,
                })
            })
            .collect();
        let domain: Vec<&str> = self.series.iter().map(|s| s.company.as_str()).collect();
        let range: Vec<&str> = self.series.iter().map(|s| s.color).collect();

        json!({
            "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
            "width": "container",
            "data": { "values": values },
            "mark": { "type": "line", "opacity": self.opacity, "clip": self.clip },
            "encoding": {
                "x": { "field": DATE_COLUMN, "type": "temporal" },
                "y": {
                    "field": PRICE_COLUMN,
                    "type": "quantitative",
                    "stack": null,
                    "scale": { "domain": [self.y_domain.0, self.y_domain.1] }
                },
                "color": {
                    "field": COMPANY_COLUMN,
                    "type": "nominal",
                    "scale": { "domain": domain, "range": range }
                }
            }
        })
    }
}

/// Maps tidy data and the selected price range to a line chart.
///
/// The value axis is pinned to `range` whatever the data holds; points
/// outside it are clipped at draw time, not removed.
pub fn render(tidy: &TidyTable, range: PriceRange) -> ChartSpec {
    let mut companies: Vec<&str> = tidy.companies();
    companies.sort_unstable();

    let series = companies
        .iter()
        .enumerate()
        .map(|(i, company)| {
            let mut points: Vec<(NaiveDate, f64)> = tidy
                .rows()
                .iter()
                .filter(|r| r.company == *company)
                .map(|r| (r.date, r.price))
                .collect();
            points.sort_by_key(|(date, _)| *date);
            Series {
                company: company.to_string(),
                color: CATEGORY10[i % CATEGORY10.len()],
                points,
            }
        })
        .collect();

    ChartSpec {
        series,
        y_domain: (range.min(), range.max()),
        x_domain: tidy.date_span(),
        opacity: LINE_OPACITY,
        clip: true,
        values: tidy.rows().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{WideTable, reshape};
    use proptest::prelude::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn tidy() -> TidyTable {
        reshape(
            &WideTable::from_series(vec![
                ("google".to_string(), vec![(d(2), 170.0), (d(1), 168.0)]),
                ("amazon".to_string(), vec![(d(1), 180.0), (d(3), 4000.0)]),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn one_line_per_company_sorted_by_name() {
        let chart = render(&tidy(), PriceRange::default());
        assert_eq!(chart.line_count(), 2);
        assert_eq!(chart.series[0].company, "amazon");
        assert_eq!(chart.series[1].company, "google");
        assert_eq!(chart.series[1].points, vec![(d(1), 168.0), (d(2), 170.0)]);
        assert_ne!(chart.series[0].color, chart.series[1].color);
    }

    #[test]
    fn out_of_range_values_are_kept() {
        let chart = render(&tidy(), PriceRange::new(0.0, 500.0).unwrap());
        assert!(chart.series[0].points.contains(&(d(3), 4000.0)));
        assert_eq!(chart.y_domain, (0.0, 500.0));
        assert!(chart.clip);
    }

    #[test]
    fn x_domain_follows_data() {
        let chart = render(&tidy(), PriceRange::default());
        assert_eq!(chart.x_domain, Some((d(1), d(3))));
        let empty = render(&TidyTable::default(), PriceRange::default());
        assert_eq!(empty.x_domain, None);
        assert_eq!(empty.line_count(), 0);
    }

    #[test]
    fn vega_lite_document_shape() {
        let spec = render(&tidy(), PriceRange::new(100.0, 300.0).unwrap()).to_vega_lite();
        assert_eq!(spec["mark"]["type"], "line");
        assert_eq!(spec["mark"]["opacity"], 0.8);
        assert_eq!(spec["mark"]["clip"], true);
        assert_eq!(spec["encoding"]["x"]["type"], "temporal");
        assert_eq!(spec["encoding"]["y"]["field"], "Stock Prices(USD)");
        assert_eq!(spec["encoding"]["y"]["scale"]["domain"], json!([100.0, 300.0]));
        assert_eq!(spec["encoding"]["color"]["field"], "Name");
        assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 4);
        assert_eq!(spec["data"]["values"][0]["Date"], "2024-05-01");
    }

    proptest! {
        #[test]
        fn y_domain_equals_selected_range(a in 0.0f64..3500.0, b in 0.0f64..3500.0) {
            let (min, max) = if a <= b { (a, b) } else { (b, a) };
            let chart = render(&tidy(), PriceRange::new(min, max).unwrap());
            prop_assert_eq!(chart.y_domain, (min, max));
            let spec = chart.to_vega_lite();
            prop_assert_eq!(&spec["encoding"]["y"]["scale"]["domain"], &json!([min, max]));
        }
    }
}
