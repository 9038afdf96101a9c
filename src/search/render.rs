use crate::models::{CarListing, SearchResultPage};
use serde::Serialize;

pub const DETAILS_LABEL: &str = "View more details";

/// Call-to-action button on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub label: String,
    pub destination: String,
}

/// Display card for one listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarCard {
    pub key: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub price_label: String,
    pub action: CallToAction,
}

impl CarCard {
    pub fn from_listing(listing: &CarListing) -> Self {
        Self {
            key: listing.id,
            title: listing.title.clone(),
            image_url: listing
                .image_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            price_label: format!("{}$", format_grouped(listing.price)),
            action: CallToAction {
                label: DETAILS_LABEL.to_string(),
                destination: listing.detail_uri.clone(),
            },
        }
    }
}

impl std::fmt::Display for CarCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({})", self.title, self.price_label)?;
        if let Some(image) = &self.image_url {
            writeln!(f, "   Image: {}", image)?;
        }
        write!(f, "   {}: {}", self.action.label, self.action.destination)
    }
}

/// Cards in the same order as the page's items.
pub fn render_cards(page: &SearchResultPage) -> Vec<CarCard> {
    page.items.iter().map(CarCard::from_listing).collect()
}

/// Round to a whole amount and group thousands with commas: `12500.4 -> "12,500"`.
pub fn format_grouped(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
