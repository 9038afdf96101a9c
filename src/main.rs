use anyhow::Context;
use car_scout::config::Config;
use car_scout::search::{FetchState, SearchController};
use car_scout::sources::{InMemorySource, ListingSource, WpGraphqlSource};
use clap::Parser;
use reqwest::Url;
use tracing::{error, info};

/// Run the dealership car search for a page URL.
#[derive(Parser, Debug)]
#[command(name = "car-scout", version, about = "Car listing search for a headless WordPress dealership")]
struct Cli {
    /// Page URL whose query (page, minPrice, maxPrice, color) drives the search.
    page_url: Url,

    /// Search the built-in demo inventory instead of the GraphQL endpoint.
    #[arg(long)]
    demo: bool,

    #[command(flatten)]
    config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        page_url: url,
        demo,
        config,
    } = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("🚗 Car Scout - dealership search");
    info!("================================");

    if demo {
        run(SearchController::new(InMemorySource::demo(), config.page_size), &url, &config).await
    } else {
        let source = WpGraphqlSource::with_config(&config)?;
        info!("Using GraphQL endpoint {}", source.endpoint());
        run(SearchController::new(source, config.page_size), &url, &config).await
    }
}

async fn run<S: ListingSource>(
    controller: SearchController<S>,
    url: &Url,
    config: &Config,
) -> anyhow::Result<()> {
    info!("Searching {} via {}...", url, controller.source().source_name());
    controller.navigate(url).await;

    let view = controller.view().await;
    if let FetchState::Error { detail, .. } = controller.state().await {
        error!("Search failed: {}", detail);
        anyhow::bail!("Search failed: {}", detail);
    }

    info!("\n✅ {} cars match, showing {}\n", view.total_count, view.cards.len());

    for (i, card) in view.cards.iter().enumerate() {
        println!("{}. {}", i + 1, card);
        println!();
    }

    if !view.links.is_empty() {
        println!("Pages:");
        for link in &view.links {
            println!("   {}", link);
        }
    }

    let results = controller.visible_results().await.unwrap_or_default();
    let json = serde_json::to_string_pretty(&results)?;
    tokio::fs::write(&config.output_path, json)
        .await
        .with_context(|| format!("Failed to write {}", config.output_path))?;
    info!("💾 Saved results to {}", config.output_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_demo_and_url() {
        let cli = Cli::try_parse_from(["car-scout", "--demo", "https://dealer.test/cars/?page=2"]).unwrap();
        assert!(cli.demo);
        assert_eq!(cli.page_url.query(), Some("page=2"));
        assert_eq!(cli.config.page_size, 3);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = Cli::try_parse_from(["car-scout", "--demp", "https://dealer.test/cars/"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn url_is_required_and_validated() {
        assert!(Cli::try_parse_from(["car-scout", "--demo"]).is_err());
        assert!(Cli::try_parse_from(["car-scout", "not a url"]).is_err());
    }
}
