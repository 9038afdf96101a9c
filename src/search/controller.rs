use crate::models::SearchResultPage;
use crate::search::pager::{page_links, PageLink};
use crate::search::params::QueryParams;
use crate::search::query::ListingRequest;
use crate::search::render::{render_cards, CarCard};
use crate::search::session::{FetchState, SearchSession};
use crate::sources::ListingSource;
use reqwest::Url;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// What the search area shows for the current URL
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub status: &'static str,
    pub cards: Vec<CarCard>,
    pub links: Vec<PageLink>,
    pub total_count: u64,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct ViewState {
    session: SearchSession,
    /// URL of the results on screen; lags behind a navigation that is
    /// still loading or has failed.
    shown_url: Option<Url>,
}

/// Runs the search for whichever URL was navigated to last.
///
/// `navigate` takes `&self` so overlapping navigations are possible; the
/// session lock is released while the fetch is in flight.
pub struct SearchController<S> {
    source: S,
    page_size: u32,
    state: Mutex<ViewState>,
}

impl<S: ListingSource> SearchController<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            state: Mutex::new(ViewState::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Derive the request for `url`, fetch it and apply the outcome unless a
    /// newer navigation happened meanwhile. Returns whether this navigation's
    /// outcome is the one now shown.
    pub async fn navigate(&self, url: &Url) -> bool {
        let request = ListingRequest::from_params(&QueryParams::from_url(url), self.page_size);
        let ticket = self.state.lock().await.session.begin(request.clone());

        let outcome = self.source.fetch(&request).await;
        if let Err(err) = &outcome {
            warn!("{} fetch failed: {:#}", self.source.source_name(), err);
        }

        let mut state = self.state.lock().await;
        let applied = state.session.complete(ticket, outcome);
        if applied {
            let succeeded = matches!(state.session.state(), FetchState::Success { .. });
            if succeeded {
                state.shown_url = Some(url.clone());
            }
            info!("Search for {} settled as {}", url, state.session.state().name());
        }
        applied
    }

    pub async fn state(&self) -> FetchState {
        self.state.lock().await.session.state().clone()
    }

    pub async fn visible_results(&self) -> Option<SearchResultPage> {
        self.state.lock().await.session.visible_results().cloned()
    }

    pub async fn view(&self) -> SearchView {
        let state = self.state.lock().await;
        let results = state.session.visible_results();
        let total_count = results.map_or(0, |r| r.total_count);
        let links = match &state.shown_url {
            Some(url) => page_links(url, total_count, self.page_size),
            None => Vec::new(),
        };
        SearchView {
            status: state.session.state().name(),
            cards: results.map(render_cards).unwrap_or_default(),
            links,
            total_count,
            error: state.session.state().error().map(str::to_string),
        }
    }
}
