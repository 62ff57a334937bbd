//! Structured search constraints derived from free text.

use serde::{Deserialize, Serialize};

/// A brand constraint: a single brand or several.
///
/// The AI parser sometimes returns a bare string and sometimes an array,
/// so both shapes deserialize transparently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrandFilter {
    One(String),
    Many(Vec<String>),
}

impl BrandFilter {
    /// Iterate over all brand names in this filter.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            BrandFilter::One(b) => std::slice::from_ref(b).iter().map(String::as_str),
            BrandFilter::Many(bs) => bs[..].iter().map(String::as_str),
        }
    }

    /// Check whether any brand matches the given product brand
    /// (case-insensitive substring in either direction).
    pub fn matches(&self, product_brand: &str) -> bool {
        let product = product_brand.to_lowercase();
        self.iter()
            .any(|b| product.contains(&b.to_lowercase()) || b.to_lowercase().contains(&product))
    }
}

/// Technical specification constraints extracted from a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

impl SpecFilters {
    pub fn is_empty(&self) -> bool {
        self.gpu.is_none() && self.cpu.is_none() && self.ram.is_none() && self.storage.is_none()
    }

    /// Iterate over (key, value) pairs that are set.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        if let Some(v) = &self.gpu {
            out.push(("gpu", v.as_str()));
        }
        if let Some(v) = &self.cpu {
            out.push(("cpu", v.as_str()));
        }
        if let Some(v) = &self.ram {
            out.push(("ram", v.as_str()));
        }
        if let Some(v) = &self.storage {
            out.push(("storage", v.as_str()));
        }
        out
    }
}

/// Structured search filters produced once per search request.
///
/// Immutable after parsing: the fetch and rank stages only read from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<BrandFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specs: Option<SpecFilters>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl SearchFilters {
    /// Filters carrying only keywords, the minimum a parse can produce.
    pub fn from_keywords(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            ..Default::default()
        }
    }
}
