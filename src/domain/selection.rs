//! Selection state: the snapshot of UI controls for one render pass.

use crate::domain::error::DashError;
use crate::domain::period::PeriodCode;

/// Slider bounds for the price range control.
pub const PRICE_FLOOR: f64 = 0.0;
pub const PRICE_CEILING: f64 = 3500.0;

/// Companies preselected on a first visit.
pub const DEFAULT_COMPANIES: [&str; 4] = ["google", "amazon", "facebook", "apple"];

/// Value-axis bounds for the chart. Never filters data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    /// Clamps both ends to the slider bounds, then requires `min <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self, DashError> {
        if min.is_nan() || max.is_nan() {
            return Err(DashError::InvalidPriceRange { min, max });
        }
        let min = min.clamp(PRICE_FLOOR, PRICE_CEILING);
        let max = max.clamp(PRICE_FLOOR, PRICE_CEILING);
        if min > max {
            return Err(DashError::InvalidPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: PRICE_FLOOR,
            max: PRICE_CEILING,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub period: PeriodCode,
    pub price_range: PriceRange,
    companies: Vec<String>,
}

impl Selection {
    pub fn new<I, S>(period: PeriodCode, price_range: PriceRange, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self {
            period,
            price_range,
            companies: Vec::new(),
        };
        for company in companies {
            selection.add_company(company);
        }
        selection
    }

    /// Adds a company unless it is already selected.
    pub fn add_company(&mut self, company: impl Into<String>) {
        let company = company.into();
        if !self.companies.contains(&company) {
            self.companies.push(company);
        }
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(PeriodCode::default(), PriceRange::default(), DEFAULT_COMPANIES)
    }
}
