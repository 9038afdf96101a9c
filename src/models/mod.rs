use serde::{Deserialize, Serialize};

/// A single car for sale, as returned by the listing query service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarListing {
    pub id: i64,
    pub title: String,
    /// Site-relative URI of the car's detail page
    pub detail_uri: String,
    pub image_url: Option<String>,
    pub price: f64,
}

/// One page of search results plus the total number of matches
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResultPage {
    pub items: Vec<CarListing>,
    pub total_count: u64,
}

impl SearchResultPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// `ceil(total_count / page_size)`, zero when there is nothing to show.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 3), 0);
        assert_eq!(total_pages(1, 3), 1);
        assert_eq!(total_pages(3, 3), 1);
        assert_eq!(total_pages(7, 3), 3);
        assert_eq!(total_pages(9, 3), 3);
        assert_eq!(total_pages(10, 3), 4);
    }

    #[test]
    fn huge_totals_do_not_overflow() {
        assert_eq!(total_pages(u64::MAX, 3), u32::MAX);
        assert_eq!(total_pages(u64::MAX, 1), u32::MAX);
        assert_eq!(total_pages(u64::from(u32::MAX) * 3, 3), u32::MAX);
    }

    #[test]
    fn zero_page_size_has_no_pages() {
        assert_eq!(total_pages(10, 0), 0);
    }
}
