//! Fetch state of one search view
//!
//! Every navigation takes a [`Ticket`]. Only the completion carrying the most
//! recent ticket is applied; earlier requests that resolve late are dropped, so
//! the state always reflects the latest URL.
//!
//! Results of the last successful fetch stay visible while a newer request is
//! loading or after it has failed.

use crate::models::SearchResultPage;
use crate::search::query::ListingRequest;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Generation number of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading {
        request: ListingRequest,
    },
    Success {
        request: ListingRequest,
        page: SearchResultPage,
        fetched_at: DateTime<Utc>,
    },
    Error {
        request: ListingRequest,
        detail: String,
    },
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading { .. } => "loading",
            FetchState::Success { .. } => "success",
            FetchState::Error { .. } => "error",
        }
    }
}

#[derive(Debug)]
pub struct SearchSession {
    state: FetchState,
    latest: u64,
    last_success: Option<SearchResultPage>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            state: FetchState::Idle,
            latest: 0,
            last_success: None,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Enter `Loading` for `request`. Supersedes any request still in flight.
    pub fn begin(&mut self, request: ListingRequest) -> Ticket {
        self.latest += 1;
        debug!("Request #{} started: {} @ offset {}", self.latest, request.filter, request.offset);
        self.state = FetchState::Loading { request };
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Apply the outcome of a request. Returns `false` when the ticket was
    /// superseded and the outcome was dropped.
    pub fn complete(&mut self, ticket: Ticket, outcome: anyhow::Result<SearchResultPage>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Dropping stale response #{} (latest is #{})",
                ticket.0, self.latest
            );
            return false;
        }
        let request = match std::mem::replace(&mut self.state, FetchState::Idle) {
            FetchState::Loading { request } => request,
            other => {
                // Already settled for this ticket.
                self.state = other;
                return false;
            }
        };
        self.state = match outcome {
            Ok(page) => {
                self.last_success = Some(page.clone());
                FetchState::Success {
                    request,
                    page,
                    fetched_at: Utc::now(),
                }
            }
            Err(err) => FetchState::Error {
                request,
                detail: format!("{:#}", err),
            },
        };
        true
    }

    /// Results to display: the current page on success, otherwise the last
    /// successful page, if any.
    pub fn visible_results(&self) -> Option<&SearchResultPage> {
        match &self.state {
            FetchState::Success { page, .. } => Some(page),
            FetchState::Idle => None,
            FetchState::Loading { .. } | FetchState::Error { .. } => self.last_success.as_ref(),
        }
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CarListing;
    use crate::search::query::FilterExpression;

    fn request(offset: u32) -> ListingRequest {
        ListingRequest {
            filter: FilterExpression::all(),
            page_size: 3,
            offset,
        }
    }

    fn page(ids: &[i64]) -> SearchResultPage {
        SearchResultPage {
            items: ids
                .iter()
                .map(|&id| CarListing {
                    id,
                    title: format!("Car {}", id),
                    detail_uri: format!("/cars/{}/", id),
                    image_url: None,
                    price: 1000.0,
                })
                .collect(),
            total_count: 10,
        }
    }

    #[test]
    fn starts_idle() {
        let session = SearchSession::new();
        assert_eq!(session.state(), &FetchState::Idle);
        assert!(session.visible_results().is_none());
    }

    #[test]
    fn loading_then_success() {
        let mut session = SearchSession::new();
        let ticket = session.begin(request(0));
        assert!(session.state().is_loading());
        assert!(session.complete(ticket, Ok(page(&[1, 2, 3]))));
        assert_eq!(session.state().name(), "success");
        assert_eq!(session.visible_results(), Some(&page(&[1, 2, 3])));
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut session = SearchSession::new();
        let first = session.begin(request(0));
        let second = session.begin(request(3));
        assert!(session.complete(second, Ok(page(&[4, 5, 6]))));
        assert!(!session.complete(first, Ok(page(&[1, 2, 3]))));
        assert_eq!(session.visible_results(), Some(&page(&[4, 5, 6])));
        match session.state() {
            FetchState::Success { request, .. } => assert_eq!(request.offset, 3),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn stale_error_is_ignored() {
        let mut session = SearchSession::new();
        let first = session.begin(request(0));
        let _second = session.begin(request(3));
        assert!(!session.complete(first, Err(anyhow::anyhow!("boom"))));
        assert!(session.state().is_loading());
    }

    #[test]
    fn error_keeps_previous_results() {
        let mut session = SearchSession::new();
        let ok = session.begin(request(0));
        session.complete(ok, Ok(page(&[1, 2, 3])));

        let failing = session.begin(request(3));
        assert_eq!(session.visible_results(), Some(&page(&[1, 2, 3])));
        let err = anyhow::anyhow!("connection refused").context("Failed to fetch cars");
        session.complete(failing, Err(err));

        assert_eq!(
            session.state().error(),
            Some("Failed to fetch cars: connection refused")
        );
        assert_eq!(session.visible_results(), Some(&page(&[1, 2, 3])));
    }

    #[test]
    fn error_without_history_shows_nothing() {
        let mut session = SearchSession::new();
        let ticket = session.begin(request(0));
        session.complete(ticket, Err(anyhow::anyhow!("boom")));
        assert!(session.visible_results().is_none());
    }

    #[test]
    fn ticket_settles_once() {
        let mut session = SearchSession::new();
        let ticket = session.begin(request(0));
        assert!(session.complete(ticket, Ok(page(&[1]))));
        assert!(!session.complete(ticket, Err(anyhow::anyhow!("late"))));
        assert_eq!(session.state().name(), "success");
    }
}
