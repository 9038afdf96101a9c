//! Structured search expressions
//!
//! Filters are carried as typed predicates all the way to the listing source.
//! Nothing here produces query-language text; each source decides how to
//! encode a [`FilterExpression`] for its backend.

use crate::models::CarListing;
use crate::search::params::{PageState, QueryParams, SearchFilters};
use serde::{Deserialize, Serialize};

/// Listing fields a search may filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Price,
    Color,
}

impl FilterField {
    /// Meta key of the field on the WordPress side.
    pub fn meta_key(&self) -> &'static str {
        match self {
            FilterField::Price => "price",
            FilterField::Color => "color",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for PredicateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredicateValue::Number(n) => write!(f, "{}", n),
            PredicateValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// A single `field operator value` comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: FilterField,
    pub operator: FilterOperator,
    pub value: PredicateValue,
}

impl Predicate {
    pub fn color_is(color: impl Into<String>) -> Self {
        Self {
            field: FilterField::Color,
            operator: FilterOperator::Equal,
            value: PredicateValue::Text(color.into()),
        }
    }

    pub fn price_at_least(price: f64) -> Self {
        Self {
            field: FilterField::Price,
            operator: FilterOperator::GreaterOrEqual,
            value: PredicateValue::Number(price),
        }
    }

    pub fn price_at_most(price: f64) -> Self {
        Self {
            field: FilterField::Price,
            operator: FilterOperator::LessOrEqual,
            value: PredicateValue::Number(price),
        }
    }

    /// Whether `listing` satisfies this predicate. `CarListing` does not carry
    /// its color, so the caller supplies it.
    pub fn matches(&self, listing: &CarListing, color: Option<&str>) -> bool {
        match (self.field, &self.value) {
            (FilterField::Price, PredicateValue::Number(bound)) => match self.operator {
                FilterOperator::Equal => listing.price == *bound,
                FilterOperator::GreaterOrEqual => listing.price >= *bound,
                FilterOperator::LessOrEqual => listing.price <= *bound,
            },
            (FilterField::Color, PredicateValue::Text(wanted)) => {
                self.operator == FilterOperator::Equal
                    && color.map_or(false, |c| c.eq_ignore_ascii_case(wanted))
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self.operator {
            FilterOperator::Equal => "=",
            FilterOperator::GreaterOrEqual => "≥",
            FilterOperator::LessOrEqual => "≤",
        };
        write!(f, "{} {} {}", self.field.meta_key(), op, self.value)
    }
}

/// AND-combination of predicates. Empty means "match everything".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    predicates: Vec<Predicate>,
}

impl FilterExpression {
    pub fn all() -> Self {
        Self::default()
    }

    /// One predicate per present filter: color, then min price, then max price.
    pub fn from_filters(filters: &SearchFilters) -> Self {
        let mut predicates = Vec::new();
        if let Some(color) = &filters.color {
            predicates.push(Predicate::color_is(color.clone()));
        }
        if let Some(min) = filters.min_price {
            predicates.push(Predicate::price_at_least(min));
        }
        if let Some(max) = filters.max_price {
            predicates.push(Predicate::price_at_most(max));
        }
        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, listing: &CarListing, color: Option<&str>) -> bool {
        self.predicates.iter().all(|p| p.matches(listing, color))
    }
}

impl std::fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.predicates.is_empty() {
            return write!(f, "TRUE");
        }
        write!(f, "AND(")?;
        for (i, p) in self.predicates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")
    }
}

/// Everything the listing query service needs for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRequest {
    pub filter: FilterExpression,
    pub page_size: u32,
    pub offset: u32,
}

impl ListingRequest {
    /// Derive the request for a page URL's query parameters.
    pub fn from_params(params: &QueryParams, page_size: u32) -> Self {
        let filters = SearchFilters::from_params(params);
        let page = PageState::from_params(params);
        Self {
            filter: FilterExpression::from_filters(&filters),
            page_size,
            offset: page.offset(page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::params::QueryParams;

    fn request(pairs: &[(&str, &str)]) -> ListingRequest {
        ListingRequest::from_params(&QueryParams::from_pairs(pairs.iter().copied()), 3)
    }

    #[test]
    fn empty_query_matches_everything() {
        let req = request(&[]);
        assert!(req.filter.is_empty());
        assert_eq!(req.offset, 0);
        assert_eq!(req.filter.to_string(), "TRUE");
    }

    #[test]
    fn min_price_and_color() {
        let req = request(&[("minPrice", "10000"), ("color", "red")]);
        assert_eq!(
            req.filter.predicates(),
            &[Predicate::color_is("red"), Predicate::price_at_least(10000.0)]
        );
        assert_eq!(req.filter.to_string(), "AND(color = \"red\", price ≥ 10000)");
        assert_eq!(req.offset, 0);
    }

    #[test]
    fn one_predicate_per_present_field() {
        let req = request(&[("maxPrice", "25000"), ("minPrice", "5000"), ("color", "green")]);
        assert_eq!(req.filter.predicates().len(), 3);
        assert_eq!(req.filter.predicates()[2], Predicate::price_at_most(25000.0));
    }

    #[test]
    fn non_numeric_price_is_never_forwarded() {
        let req = request(&[("minPrice", "1000\"}]"), ("maxPrice", "")]);
        assert!(req.filter.is_empty());
        assert!(req.filter.predicates().iter().all(|p| p.field != FilterField::Price));
    }

    #[test]
    fn offset_follows_page() {
        assert_eq!(request(&[("page", "2")]).offset, 3);
        assert_eq!(request(&[("page", "abc")]).offset, 0);
    }

    #[test]
    fn predicates_match_listings() {
        let car = CarListing {
            id: 1,
            title: "Red roadster".to_string(),
            detail_uri: "/cars/red-roadster/".to_string(),
            image_url: None,
            price: 12_000.0,
        };
        let filters = SearchFilters {
            min_price: Some(10_000.0),
            max_price: Some(12_000.0),
            color: Some("RED".to_string()),
        };
        let expr = FilterExpression::from_filters(&filters);
        assert!(expr.matches(&car, Some("red")));
        assert!(!expr.matches(&car, Some("white")));
        assert!(!expr.matches(&car, None));
        assert!(FilterExpression::all().matches(&car, None));
    }
}
