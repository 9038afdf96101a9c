use crate::config::Config;
use crate::models::{CarListing, SearchResultPage};
use crate::search::query::{FilterExpression, FilterOperator, ListingRequest, PredicateValue};
use crate::sources::traits::ListingSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// The filter travels in `$where`; the document itself never changes.
pub const CARS_QUERY: &str = r#"query CarsQuery($where: RootQueryToCarConnectionWhereArgs) {
  cars(where: $where) {
    nodes {
      databaseId
      title
      uri
      featuredImage {
        node {
          sourceUrl(size: LARGE)
        }
      }
      carDetails {
        price
      }
    }
    pageInfo {
      offsetPagination {
        total
      }
    }
  }
}"#;

/// Largest `total` accepted from the server; anything above is a corrupt count.
pub const MAX_TOTAL_RESULTS: u64 = 10_000_000;

/// Listing source backed by the site's WPGraphQL endpoint
pub struct WpGraphqlSource {
    client: Client,
    endpoint: Url,
}

impl WpGraphqlSource {
    /// Create a source for the endpoint and timeout in `config`
    pub fn with_config(config: &Config) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid GraphQL endpoint: {}", config.endpoint))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("car-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ListingSource for WpGraphqlSource {
    async fn fetch(&self, request: &ListingRequest) -> Result<SearchResultPage> {
        info!(
            "Querying cars: {} (size {}, offset {})",
            request.filter, request.page_size, request.offset
        );

        let body = json!({
            "query": CARS_QUERY,
            "variables": build_variables(request),
        });
        debug!("POST {} {}", self.endpoint, body["variables"]);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .context("Failed to reach GraphQL endpoint")?;

        if !response.status().is_success() {
            warn!("GraphQL endpoint returned status: {}", response.status());
            anyhow::bail!("GraphQL request failed: {}", response.status());
        }

        let text = response
            .text()
            .await
            .context("Failed to read response body")?;
        debug!("Downloaded {} bytes of JSON", text.len());

        let payload: Value = serde_json::from_str(&text).context("Response is not valid JSON")?;
        parse_response(payload)
    }

    fn source_name(&self) -> &'static str {
        "WPGraphQL"
    }
}

/// `variables` object for [`CARS_QUERY`].
pub fn build_variables(request: &ListingRequest) -> Value {
    let mut where_args = serde_json::Map::new();
    if let Some(meta_query) = meta_query(&request.filter) {
        where_args.insert("metaQuery".to_string(), meta_query);
    }
    where_args.insert(
        "offsetPagination".to_string(),
        json!({ "size": request.page_size, "offset": request.offset }),
    );
    json!({ "where": Value::Object(where_args) })
}

fn meta_query(filter: &FilterExpression) -> Option<Value> {
    if filter.is_empty() {
        return None;
    }
    let meta_array: Vec<Value> = filter
        .predicates()
        .iter()
        .map(|p| {
            let compare = match p.operator {
                FilterOperator::Equal => "EQUAL_TO",
                FilterOperator::GreaterOrEqual => "GREATER_THAN_OR_EQUAL_TO",
                FilterOperator::LessOrEqual => "LESS_THAN_OR_EQUAL_TO",
            };
            let mut entry = json!({
                "key": p.field.meta_key(),
                "compare": compare,
            });
            match &p.value {
                PredicateValue::Number(n) => {
                    entry["type"] = json!("NUMERIC");
                    entry["value"] = json!(n.to_string());
                }
                PredicateValue::Text(s) => {
                    entry["value"] = json!(s);
                }
            }
            entry
        })
        .collect();
    Some(json!({ "relation": "AND", "metaArray": meta_array }))
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<CarsData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CarsData {
    cars: Option<CarConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarConnection {
    #[serde(default)]
    nodes: Vec<CarNode>,
    page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarNode {
    database_id: i64,
    title: Option<String>,
    uri: Option<String>,
    featured_image: Option<FeaturedImage>,
    car_details: Option<CarDetails>,
}

#[derive(Debug, Deserialize)]
struct FeaturedImage {
    node: Option<MediaItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaItem {
    source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CarDetails {
    price: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    offset_pagination: Option<OffsetPagination>,
}

#[derive(Debug, Deserialize)]
struct OffsetPagination {
    total: Option<u64>,
}

/// Turn a GraphQL response body into a result page.
pub fn parse_response(payload: Value) -> Result<SearchResultPage> {
    let response: GraphqlResponse =
        serde_json::from_value(payload).context("Unexpected GraphQL response shape")?;

    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        anyhow::bail!("GraphQL errors: {}", messages.join("; "));
    }

    let Some(cars) = response.data.and_then(|d| d.cars) else {
        warn!("GraphQL response has no cars connection");
        return Ok(SearchResultPage::empty());
    };

    let total_count = cars
        .page_info
        .and_then(|p| p.offset_pagination)
        .and_then(|o| o.total)
        .unwrap_or(0);
    if total_count > MAX_TOTAL_RESULTS {
        anyhow::bail!(
            "Implausible result total {} (limit {})",
            total_count,
            MAX_TOTAL_RESULTS
        );
    }

    let items = cars
        .nodes
        .into_iter()
        .map(|node| CarListing {
            id: node.database_id,
            title: node.title.unwrap_or_default(),
            detail_uri: node.uri.unwrap_or_default(),
            image_url: node
                .featured_image
                .and_then(|f| f.node)
                .and_then(|m| m.source_url),
            price: node
                .car_details
                .and_then(|d| d.price)
                .map(|p| price_from_json(&p))
                .unwrap_or(0.0),
        })
        .collect();

    Ok(SearchResultPage { items, total_count })
}

// ACF number fields come back as numbers or numeric strings depending on the plugin version.
fn price_from_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
