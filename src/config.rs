use clap::Args;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Runtime settings, taken from flags or `CAR_SCOUT_*` environment variables
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// WPGraphQL endpoint of the dealership site.
    #[arg(long, env = "CAR_SCOUT_ENDPOINT", default_value = "http://localhost:8000/graphql")]
    pub endpoint: String,

    /// Cars per results page.
    #[arg(
        long,
        env = "CAR_SCOUT_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub page_size: u32,

    /// HTTP request timeout in seconds.
    #[arg(
        long,
        env = "CAR_SCOUT_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "CAR_SCOUT_LOG", default_value = "info")]
    pub log_level: String,

    /// Where the fetched results page is saved.
    #[arg(short, long, env = "CAR_SCOUT_OUTPUT", default_value = "search_results.json")]
    pub output_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/graphql".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
            log_level: "info".to_string(),
            output_path: "search_results.json".to_string(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
