use crate::search::pager::relative_destination;
use crate::search::params::{QueryParams, COLOR_KEY, MAX_PRICE_KEY, MIN_PRICE_KEY, PAGE_KEY};
use reqwest::Url;

/// Colors offered by the search form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Any,
    Red,
    White,
    Green,
}

impl ColorChoice {
    pub const ALL: [ColorChoice; 4] = [
        ColorChoice::Any,
        ColorChoice::Red,
        ColorChoice::White,
        ColorChoice::Green,
    ];

    /// Form value; empty for "any color".
    pub fn value(&self) -> &'static str {
        match self {
            ColorChoice::Any => "",
            ColorChoice::Red => "red",
            ColorChoice::White => "white",
            ColorChoice::Green => "green",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorChoice::Any => "Any color",
            ColorChoice::Red => "Red",
            ColorChoice::White => "White",
            ColorChoice::Green => "Green",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.value() == value)
    }
}

/// In-progress filter edits. Nothing is searched until [`FilterForm::submit`]
/// hands back a URL to navigate to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    min_price: String,
    max_price: String,
    color: ColorChoice,
}

impl FilterForm {
    /// Pre-fill the fields from the URL being shown. A color the form does not
    /// offer falls back to `Any`.
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            min_price: params.get(MIN_PRICE_KEY).unwrap_or_default().to_string(),
            max_price: params.get(MAX_PRICE_KEY).unwrap_or_default().to_string(),
            color: params
                .get(COLOR_KEY)
                .and_then(ColorChoice::from_value)
                .unwrap_or_default(),
        }
    }

    pub fn set_min_price(&mut self, value: impl Into<String>) {
        self.min_price = value.into();
    }

    pub fn set_max_price(&mut self, value: impl Into<String>) {
        self.max_price = value.into();
    }

    pub fn set_color(&mut self, choice: ColorChoice) {
        self.color = choice;
    }

    pub fn min_price(&self) -> &str {
        &self.min_price
    }

    pub fn max_price(&self) -> &str {
        &self.max_price
    }

    pub fn color(&self) -> ColorChoice {
        self.color
    }

    /// Destination for the submitted form. Replaces the current query and
    /// starts over at page 1.
    pub fn submit(&self, current: &Url) -> String {
        let mut params = QueryParams::from_pairs([
            (MIN_PRICE_KEY, self.min_price.as_str()),
            (MAX_PRICE_KEY, self.max_price.as_str()),
            (COLOR_KEY, self.color.value()),
        ]);
        params.set(PAGE_KEY, "1");
        relative_destination(current, &params)
    }
}
