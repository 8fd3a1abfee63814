use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::feed::PageSource;
use super::scroll::ScrollPosition;
use crate::movies::{MoviePage, MovieSummary};
use crate::tmdb::ApiResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedState {
    /// Nothing requested yet.
    Idle,
    Fetching,
    /// Holds at least one movie.
    Ready,
    /// Last reset produced no movies.
    Empty,
}

/// What completing a fetch did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FetchOutcome {
    Replaced { count: usize },
    Appended { from: usize, count: usize },
    /// Append came back empty.
    Exhausted,
    Failed,
    /// A newer reset started while this fetch was in flight.
    Stale,
}

/// A fetch that has been started but not yet applied.
pub struct FetchTicket {
    generation: u64,
    page: u32,
    page_size: u32,
    reset: bool,
    source: Arc<dyn PageSource>,
}

impl FetchTicket {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub async fn run(&self) -> ApiResult<MoviePage> {
        self.source.fetch_page(self.page, self.page_size).await
    }
}

/// Accumulating list fed page by page from a `PageSource`.
///
/// `page` is always the next page to request. A reset asks for page 1 and
/// leaves `page` at 2; every non-empty append bumps it by one. Results that
/// arrive for an older generation are dropped.
pub struct Paginator {
    source: Arc<dyn PageSource>,
    items: Vec<MovieSummary>,
    page: u32,
    page_size: u32,
    fetching: bool,
    generation: u64,
    state: FeedState,
}

impl Paginator {
    pub fn new(source: Arc<dyn PageSource>, page_size: u32) -> Self {
        Self {
            source,
            items: Vec::new(),
            page: 1,
            page_size,
            fetching: false,
            generation: 0,
            state: FeedState::Idle,
        }
    }

    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn source(&self) -> &Arc<dyn PageSource> {
        &self.source
    }

    /// Start a fetch that will replace the list. Always allowed; supersedes
    /// whatever is in flight.
    pub fn begin_reset(&mut self) -> FetchTicket {
        self.generation += 1;
        self.fetching = true;
        self.state = FeedState::Fetching;
        FetchTicket {
            generation: self.generation,
            page: 1,
            page_size: self.page_size,
            reset: true,
            source: self.source.clone(),
        }
    }

    /// Start a fetch of the next page, unless one is already running or
    /// there is nothing to append to.
    pub fn begin_append(&mut self) -> Option<FetchTicket> {
        if self.fetching || self.state != FeedState::Ready {
            return None;
        }
        self.fetching = true;
        self.state = FeedState::Fetching;
        Some(FetchTicket {
            generation: self.generation,
            page: self.page,
            page_size: self.page_size,
            reset: false,
            source: self.source.clone(),
        })
    }

    /// Switch to another source (e.g. a new search keyword) and reset.
    pub fn retarget(&mut self, source: Arc<dyn PageSource>) -> FetchTicket {
        self.source = source;
        self.begin_reset()
    }

    /// Start an append if `position` is within `threshold` pixels of the
    /// bottom of the document.
    pub fn on_scroll(&mut self, position: &ScrollPosition, threshold: f64) -> Option<FetchTicket> {
        if !position.near_bottom(threshold) {
            return None;
        }
        self.begin_append()
    }

    pub fn complete(&mut self, ticket: FetchTicket, result: ApiResult<MoviePage>) -> FetchOutcome {
        if ticket.generation != self.generation {
            debug!(
                source = %ticket.source.label(),
                page = ticket.page,
                "Dropping result of superseded fetch"
            );
            return FetchOutcome::Stale;
        }
        self.fetching = false;

        if ticket.reset {
            return match result {
                Ok(page) => {
                    self.items = page.results;
                    self.page = 2;
                    self.state = if self.items.is_empty() {
                        FeedState::Empty
                    } else {
                        FeedState::Ready
                    };
                    FetchOutcome::Replaced {
                        count: self.items.len(),
                    }
                }
                Err(_) => {
                    self.items.clear();
                    self.page = 1;
                    self.state = FeedState::Empty;
                    FetchOutcome::Failed
                }
            };
        }

        self.state = FeedState::Ready;
        match result {
            Ok(page) if !page.is_empty() => {
                let from = self.items.len();
                let count = page.results.len();
                self.items.extend(page.results);
                self.page += 1;
                FetchOutcome::Appended { from, count }
            }
            Ok(_) => {
                warn!(source = %self.source.label(), page = ticket.page, "No more results found.");
                FetchOutcome::Exhausted
            }
            Err(e) => {
                warn!(source = %self.source.label(), page = ticket.page, "Could not load more movies: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    pub async fn reset(&mut self) -> FetchOutcome {
        let ticket = self.begin_reset();
        let result = ticket.run().await;
        self.complete(ticket, result)
    }

    pub async fn load_more(&mut self) -> Option<FetchOutcome> {
        let ticket = self.begin_append()?;
        let result = ticket.run().await;
        Some(self.complete(ticket, result))
    }
}
