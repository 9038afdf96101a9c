use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PAGE_KEY: &str = "page";
pub const MIN_PRICE_KEY: &str = "minPrice";
pub const MAX_PRICE_KEY: &str = "maxPrice";
pub const COLOR_KEY: &str = "color";

/// Decoded query-string pairs of a page URL, in their original order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn from_url(url: &Url) -> Self {
        Self {
            pairs: url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// First value for `key`, like `URLSearchParams.get`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace every `key` entry with a single one, keeping the position of the
    /// first occurrence. Appends when the key is absent.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                self.pairs[idx].1 = value;
                let mut seen = 0usize;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Search filters derived from the URL on every navigation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub color: Option<String>,
}

impl SearchFilters {
    /// Read the filters from query parameters. Malformed prices count as absent.
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            min_price: parse_price(params, MIN_PRICE_KEY),
            max_price: parse_price(params, MAX_PRICE_KEY),
            color: non_empty(params.get(COLOR_KEY)).map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none() && self.color.is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(params: &QueryParams, key: &str) -> Option<f64> {
    let raw = non_empty(params.get(key))?;
    match raw.parse::<f64>() {
        Ok(price) if price.is_finite() => Some(price),
        _ => {
            debug!("Ignoring non-numeric {}={:?}", key, raw);
            None
        }
    }
}

/// Current page of the search, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    page_number: u32,
}

impl PageState {
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number: page_number.max(1),
        }
    }

    /// Missing, non-numeric, zero and negative values all resolve to page 1.
    pub fn from_params(params: &QueryParams) -> Self {
        let page = params
            .get(PAGE_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(1);
        Self::new(page)
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Offset of the first result on this page.
    pub fn offset(&self, page_size: u32) -> u32 {
        page_size.saturating_mul(self.page_number - 1)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(1)
    }
}
