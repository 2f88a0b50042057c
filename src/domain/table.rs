//! Wide (company × date) and tidy (date, company, price) price tables.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::domain::error::DashError;

pub const DATE_COLUMN: &str = "Date";
pub const COMPANY_COLUMN: &str = "Name";
pub const PRICE_COLUMN: &str = "Stock Prices(USD)";

/// One company's closing prices, aligned with [`WideTable::dates`].
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub company: String,
    pub cells: Vec<Option<f64>>,
}

/// Closing prices with one row per company and one column per date.
///
/// Columns are sorted ascending and unique; row names are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideTable {
    dates: Vec<NaiveDate>,
    rows: Vec<PriceRow>,
}

impl WideTable {
    /// Builds a table from per-company series. The column set is the union
    /// of all dates; a date missing from a series is an empty cell.
    pub fn from_series<I>(series: I) -> Result<Self, DashError>
    where
        I: IntoIterator<Item = (String, Vec<(NaiveDate, f64)>)>,
    {
        let mut named: Vec<(String, BTreeMap<NaiveDate, f64>)> = Vec::new();
        for (company, points) in series {
            if named.iter().any(|(c, _)| *c == company) {
                return Err(DashError::DuplicateCompany { name: company });
            }
            named.push((company, points.into_iter().collect()));
        }

        let dates: Vec<NaiveDate> = named
            .iter()
            .flat_map(|(_, points)| points.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = named
            .into_iter()
            .map(|(company, points)| PriceRow {
                cells: dates.iter().map(|d| points.get(d).copied()).collect(),
                company,
            })
            .collect();

        Ok(Self { dates, rows })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn companies(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.company.as_str())
    }

    pub fn row(&self, company: &str) -> Option<&PriceRow> {
        self.rows.iter().find(|r| r.company == company)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Restricts the table to `companies`, in the order given.
    ///
    /// Date columns with no value in any selected row are dropped. A name
    /// that is not a row of this table is a lookup error.
    pub fn select(&self, companies: &[String]) -> Result<WideTable, DashError> {
        let mut rows = Vec::with_capacity(companies.len());
        for name in companies {
            let row = self
                .row(name)
                .ok_or_else(|| DashError::UnknownCompany { name: name.clone() })?;
            if rows.iter().any(|r: &PriceRow| r.company == *name) {
                continue;
            }
            rows.push(row.clone());
        }

        let keep: Vec<usize> = (0..self.dates.len())
            .filter(|&col| rows.iter().any(|r| r.cells[col].is_some()))
            .collect();

        Ok(WideTable {
            dates: keep.iter().map(|&col| self.dates[col]).collect(),
            rows: rows
                .into_iter()
                .map(|r| PriceRow {
                    cells: keep.iter().map(|&col| r.cells[col]).collect(),
                    company: r.company,
                })
                .collect(),
        })
    }

    pub fn sorted_by_name(&self) -> WideTable {
        let mut sorted = self.clone();
        sorted.rows.sort_by(|a, b| a.company.cmp(&b.company));
        sorted
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TidyRow {
    pub date: NaiveDate,
    pub company: String,
    pub price: f64,
}

/// Long-form price table: one row per (date, company) observation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TidyTable {
    rows: Vec<TidyRow>,
}

impl TidyTable {
    pub fn rows(&self) -> &[TidyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct companies in order of first appearance.
    pub fn companies(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !out.contains(&row.company.as_str()) {
                out.push(&row.company);
            }
        }
        out
    }

    /// Earliest and latest date present, if any.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.date).min()?;
        let max = self.rows.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Long → wide: the inverse of [`reshape`].
    pub fn pivot(&self) -> WideTable {
        let mut series: Vec<(String, Vec<(NaiveDate, f64)>)> = Vec::new();
        for row in &self.rows {
            match series.iter_mut().find(|(c, _)| *c == row.company) {
                Some((_, points)) => points.push((row.date, row.price)),
                None => series.push((row.company.clone(), vec![(row.date, row.price)])),
            }
        }
        // Companies are unique by construction.
        WideTable::from_series(series).unwrap_or_default()
    }
}

/// Wide → long. Transposes so dates become rows, then melts the company
/// columns into a (date, company, price) triple per present cell.
///
/// Output is grouped by company in table order, dates ascending.
pub fn reshape(table: &WideTable) -> TidyTable {
    let rows = table
        .rows
        .iter()
        .flat_map(|row| {
            table
                .dates
                .iter()
                .zip(&row.cells)
                .filter_map(move |(date, cell)| {
                    cell.map(|price| TidyRow {
                        date: *date,
                        company: row.company.clone(),
                        price,
                    })
                })
        })
        .collect();
    TidyTable { rows }
}
