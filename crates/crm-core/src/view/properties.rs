// File: crm-core/src/view/properties.rs
// Purpose: Property search, category and price-band filtering

use serde::Serialize;
use std::fmt;

use crate::model::{Category, Property};

/// Price bucket selector. Bands are half-open on the left: `(lower, upper]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PriceBand {
    #[default]
    All,
    UpTo100k,
    UpTo300k,
    UpTo500k,
    UpTo1M,
    Above1M,
}

impl PriceBand {
    pub const ALL: [PriceBand; 6] = [
        PriceBand::All,
        PriceBand::UpTo100k,
        PriceBand::UpTo300k,
        PriceBand::UpTo500k,
        PriceBand::UpTo1M,
        PriceBand::Above1M,
    ];

    /// Value used in query strings and select options
    pub fn param(self) -> &'static str {
        match self {
            PriceBand::All => "Todos",
            PriceBand::UpTo100k => "100k",
            PriceBand::UpTo300k => "300k",
            PriceBand::UpTo500k => "500k",
            PriceBand::UpTo1M => "1m",
            PriceBand::Above1M => "1m+",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceBand::All => "Todos os Preços",
            PriceBand::UpTo100k => "Até R$100 mil",
            PriceBand::UpTo300k => "R$100 mil a R$300 mil",
            PriceBand::UpTo500k => "R$300 mil a R$500 mil",
            PriceBand::UpTo1M => "R$500 mil a R$1 milhão",
            PriceBand::Above1M => "Acima de R$1 milhão",
        }
    }

    /// Unknown values select every band
    pub fn from_param(param: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| band.param() == param.trim())
            .unwrap_or_default()
    }

    pub fn contains(self, price: f64) -> bool {
        match self {
            PriceBand::All => true,
            PriceBand::UpTo100k => price <= 100_000.0,
            PriceBand::UpTo300k => price > 100_000.0 && price <= 300_000.0,
            PriceBand::UpTo500k => price > 300_000.0 && price <= 500_000.0,
            PriceBand::UpTo1M => price > 500_000.0 && price <= 1_000_000.0,
            PriceBand::Above1M => price > 1_000_000.0,
        }
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

/// Category selector: everything, or one specific category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub const ALL_PARAM: &'static str = "Todos";

    pub fn from_param(param: &str) -> Self {
        param
            .parse::<Category>()
            .map(CategoryFilter::Only)
            .unwrap_or_default()
    }

    pub fn param(self) -> &'static str {
        match self {
            CategoryFilter::All => Self::ALL_PARAM,
            CategoryFilter::Only(category) => category.label(),
        }
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

/// The three independent property filter inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    pub query: String,
    pub category: CategoryFilter,
    pub price: PriceBand,
}

impl PropertyFilter {
    /// Build a filter from raw query-string values; absent means "all"
    pub fn from_params(query: Option<&str>, category: Option<&str>, price: Option<&str>) -> Self {
        Self {
            query: query.unwrap_or_default().to_string(),
            category: category.map(CategoryFilter::from_param).unwrap_or_default(),
            price: price.map(PriceBand::from_param).unwrap_or_default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self != &Self::default()
    }
}

/// Price rendered as plain digits, the way a search term is compared to it
pub fn price_digits(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{price:.0}")
    } else {
        price.to_string()
    }
}

/// Apply all three filters conjunctively, preserving input order.
///
/// The text query matches title or address case-insensitively. When it
/// contains digits, those digits are also matched against the price.
pub fn filter_properties<'a>(
    properties: &'a [Property],
    filter: &PropertyFilter,
) -> Vec<&'a Property> {
    let term = filter.query.to_lowercase();
    let digits: String = term.chars().filter(char::is_ascii_digit).collect();

    properties
        .iter()
        .filter(|p| {
            filter.query.is_empty()
                || p.title.to_lowercase().contains(&term)
                || p.address.to_lowercase().contains(&term)
                || (!digits.is_empty() && price_digits(p.price).contains(&digits))
        })
        .filter(|p| filter.category.matches(p.category))
        .filter(|p| filter.price.contains(p.price))
        .collect()
}
