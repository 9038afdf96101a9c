use crate::models::{CarListing, SearchResultPage};
use crate::search::query::ListingRequest;
use crate::sources::traits::ListingSource;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

/// A listing together with the color the search filters on
#[derive(Debug, Clone)]
pub struct StockEntry {
    pub listing: CarListing,
    pub color: String,
}

/// Listing source over a fixed inventory held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    stock: Vec<StockEntry>,
}

impl InMemorySource {
    pub fn new(stock: Vec<StockEntry>) -> Self {
        Self { stock }
    }

    /// Small dealership inventory used by `--demo`
    pub fn demo() -> Self {
        info!("📋 Using built-in demo inventory");

        let car = |id: i64, title: &str, slug: &str, price: f64, color: &str, image: bool| StockEntry {
            listing: CarListing {
                id,
                title: title.to_string(),
                detail_uri: format!("/cars/{}/", slug),
                image_url: image.then(|| format!("https://cdn.example.com/cars/{}.jpg", slug)),
                price,
            },
            color: color.to_string(),
        };

        Self::new(vec![
            car(101, "Ford Mustang GT", "ford-mustang-gt", 38_500.0, "red", true),
            car(102, "Volkswagen Golf", "volkswagen-golf", 14_900.0, "white", true),
            car(103, "Land Rover Defender", "land-rover-defender", 52_000.0, "green", true),
            car(104, "Fiat 500", "fiat-500", 8_750.0, "red", false),
            car(105, "Toyota Corolla", "toyota-corolla", 12_300.0, "white", true),
            car(106, "Mazda MX-5", "mazda-mx-5", 24_990.0, "red", true),
            car(107, "Skoda Octavia Estate", "skoda-octavia-estate", 17_450.0, "green", false),
        ])
    }
}

#[async_trait]
impl ListingSource for InMemorySource {
    async fn fetch(&self, request: &ListingRequest) -> Result<SearchResultPage> {
        let matching: Vec<&StockEntry> = self
            .stock
            .iter()
            .filter(|e| request.filter.matches(&e.listing, Some(&e.color)))
            .collect();

        debug!(
            "{} of {} cars match {}",
            matching.len(),
            self.stock.len(),
            request.filter
        );

        let items = matching
            .iter()
            .skip(request.offset as usize)
            .take(request.page_size as usize)
            .map(|e| e.listing.clone())
            .collect();

        Ok(SearchResultPage {
            items,
            total_count: matching.len() as u64,
        })
    }

    fn source_name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::params::QueryParams;

    fn request(pairs: &[(&str, &str)]) -> ListingRequest {
        ListingRequest::from_params(&QueryParams::from_pairs(pairs.iter().copied()), 3)
    }

    #[tokio::test]
    async fn pages_through_everything() {
        let source = InMemorySource::demo();
        let first = source.fetch(&request(&[])).await.unwrap();
        assert_eq!(first.total_count, 7);
        assert_eq!(first.items.len(), 3);

        let last = source.fetch(&request(&[("page", "3")])).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].id, 107);
    }

    #[tokio::test]
    async fn filters_by_color_and_price() {
        let source = InMemorySource::demo();
        let page = source
            .fetch(&request(&[("color", "red"), ("minPrice", "10000")]))
            .await
            .unwrap();
        let ids: Vec<i64> = page.items.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![101, 106]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn out_of_range_page_is_empty() {
        let source = InMemorySource::demo();
        let page = source.fetch(&request(&[("page", "40")])).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 7);
    }
}
