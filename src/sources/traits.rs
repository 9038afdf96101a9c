use crate::models::SearchResultPage;
use crate::search::query::ListingRequest;
use anyhow::Result;
use async_trait::async_trait;

/// Backend that answers car listing searches
/// Lets the search run against the live site or an in-memory inventory
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page of listings matching the request
    async fn fetch(&self, request: &ListingRequest) -> Result<SearchResultPage>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
