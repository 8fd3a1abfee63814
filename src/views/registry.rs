use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::movies::MovieSummary;
use crate::pagination::{FeedState, FetchOutcome, PageSource, Paginator, ScrollPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Listing,
    Recommendations,
}

/// Items a fetch added to a view, plus where the view stands afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ViewUpdate {
    pub outcome: Option<FetchOutcome>,
    pub items: Vec<MovieSummary>,
    pub total: usize,
    pub page: u32,
    pub state: FeedState,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub id: String,
    pub kind: ViewKind,
    pub state: FeedState,
    pub page: u32,
    pub source: String,
    pub last_active: DateTime<Utc>,
    pub items: Vec<MovieSummary>,
}

/// One list on one open page.
pub struct View {
    pub id: String,
    pub kind: ViewKind,
    paginator: Mutex<Paginator>,
    last_active: RwLock<DateTime<Utc>>,
}

impl View {
    fn new(kind: ViewKind, paginator: Paginator) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            kind,
            paginator: Mutex::new(paginator),
            last_active: RwLock::new(Utc::now()),
        }
    }

    async fn touch(&self) {
        *self.last_active.write().await = Utc::now();
    }

    // The paginator lock is released while the upstream request runs, so a
    // reset can start while an older fetch is still outstanding.

    pub async fn reset(&self) -> ViewUpdate {
        let ticket = self.paginator.lock().await.begin_reset();
        let result = ticket.run().await;
        let mut paginator = self.paginator.lock().await;
        let outcome = paginator.complete(ticket, result);
        update(&paginator, Some(outcome))
    }

    pub async fn retarget(&self, source: Arc<dyn PageSource>) -> ViewUpdate {
        let ticket = self.paginator.lock().await.retarget(source);
        let result = ticket.run().await;
        let mut paginator = self.paginator.lock().await;
        let outcome = paginator.complete(ticket, result);
        update(&paginator, Some(outcome))
    }

    /// Handle a scroll event; only the movies it appended are returned.
    pub async fn scroll(&self, position: &ScrollPosition, threshold: f64) -> ViewUpdate {
        let ticket = self.paginator.lock().await.on_scroll(position, threshold);
        let ticket = match ticket {
            Some(ticket) => ticket,
            None => {
                let paginator = self.paginator.lock().await;
                return ViewUpdate {
                    outcome: None,
                    items: Vec::new(),
                    total: paginator.items().len(),
                    page: paginator.page(),
                    state: paginator.state(),
                };
            }
        };

        let result = ticket.run().await;
        let mut paginator = self.paginator.lock().await;
        let outcome = paginator.complete(ticket, result);
        let items = match outcome {
            FetchOutcome::Appended { from, .. } => paginator.items()[from..].to_vec(),
            _ => Vec::new(),
        };
        ViewUpdate {
            outcome: Some(outcome),
            items,
            total: paginator.items().len(),
            page: paginator.page(),
            state: paginator.state(),
        }
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let paginator = self.paginator.lock().await;
        ViewSnapshot {
            id: self.id.clone(),
            kind: self.kind,
            state: paginator.state(),
            page: paginator.page(),
            source: paginator.source().label(),
            last_active: *self.last_active.read().await,
            items: paginator.items().to_vec(),
        }
    }
}

fn update(paginator: &Paginator, outcome: Option<FetchOutcome>) -> ViewUpdate {
    ViewUpdate {
        outcome,
        items: paginator.items().to_vec(),
        total: paginator.items().len(),
        page: paginator.page(),
        state: paginator.state(),
    }
}

/// Live views, keyed by id. Pages attach a view when rendered and detach it
/// when closed; views that stop reporting are swept after `idle_ttl`. At most
/// `max_views` are kept.
pub struct ViewRegistry {
    views: RwLock<HashMap<String, Arc<View>>>,
    idle_ttl: Duration,
    max_views: usize,
}

impl ViewRegistry {
    pub fn new(idle_ttl: Duration, max_views: usize) -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
            idle_ttl,
            max_views: max_views.max(1),
        }
    }

    pub async fn attach(&self, kind: ViewKind, paginator: Paginator) -> Arc<View> {
        let view = Arc::new(View::new(kind, paginator));
        let mut views = self.views.write().await;

        while views.len() >= self.max_views {
            let mut oldest: Option<(DateTime<Utc>, String)> = None;
            for (id, v) in views.iter() {
                let seen = *v.last_active.read().await;
                if oldest.as_ref().map_or(true, |(t, _)| seen < *t) {
                    oldest = Some((seen, id.clone()));
                }
            }
            let Some((_, id)) = oldest else { break };
            views.remove(&id);
            debug!(view = %id, "Evicted least recently active view");
        }

        views.insert(view.id.clone(), view.clone());
        debug!(view = %view.id, kind = ?kind, "Attached view");
        view
    }

    /// Look up a view and mark it active.
    pub async fn get(&self, id: &str) -> Option<Arc<View>> {
        let view = self.views.read().await.get(id).cloned()?;
        view.touch().await;
        Some(view)
    }

    pub async fn detach(&self, id: &str) -> bool {
        let removed = self.views.write().await.remove(id).is_some();
        if removed {
            debug!(view = %id, "Detached view");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.views.read().await.len()
    }

    /// Drop views idle for longer than the TTL. Returns how many went.
    pub async fn sweep(&self) -> usize {
        let ttl = chrono::Duration::from_std(self.idle_ttl).unwrap_or_else(|_| chrono::Duration::days(365));
        let cutoff = Utc::now() - ttl;

        let mut expired = Vec::new();
        for (id, view) in self.views.read().await.iter() {
            if *view.last_active.read().await < cutoff {
                expired.push(id.clone());
            }
        }

        if expired.is_empty() {
            return 0;
        }
        let mut views = self.views.write().await;
        for id in &expired {
            views.remove(id);
        }
        expired.len()
    }

    pub fn start_background_sweep(self: Arc<Self>, interval_secs: u64) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            loop {
                interval.tick().await;
                let removed = self.sweep().await;
                if removed > 0 {
                    info!("Expired {} idle views", removed);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::ListingFeed;
    use crate::schema::SearchForm;
    use crate::testing::FakeMovies;
    use crate::tmdb::MovieSource;

    fn bottom() -> ScrollPosition {
        ScrollPosition {
            viewport_height: 1000.0,
            scroll_y: 1000.0,
            document_height: 2050.0,
        }
    }

    fn listing(movies: Arc<dyn MovieSource>) -> Paginator {
        Paginator::new(Arc::new(ListingFeed::popular(movies)), 20)
    }

    #[tokio::test]
    async fn test_attach_reset_scroll_detach() {
        let movies: Arc<dyn MovieSource> = Arc::new(FakeMovies::new().with_popular_pages(3, 20));
        let registry = ViewRegistry::new(Duration::from_secs(60), 100);

        let view = registry.attach(ViewKind::Listing, listing(movies)).await;
        let first = view.reset().await;
        assert_eq!(first.total, 20);
        assert_eq!(first.page, 2);

        let found = registry.get(&view.id).await.unwrap();
        let more = found.scroll(&bottom(), 100.0).await;
        assert_eq!(more.outcome, Some(FetchOutcome::Appended { from: 20, count: 20 }));
        assert_eq!(more.items.len(), 20);
        assert_eq!(more.items[0].id, 20);
        assert_eq!(more.total, 40);
        assert_eq!(more.page, 3);

        assert!(registry.detach(&view.id).await);
        assert!(!registry.detach(&view.id).await);
        assert!(registry.get(&view.id).await.is_none());
    }

    #[tokio::test]
    async fn test_scroll_not_near_bottom_returns_nothing() {
        let movies: Arc<dyn MovieSource> = Arc::new(FakeMovies::new().with_popular_pages(3, 20));
        let registry = ViewRegistry::new(Duration::from_secs(60), 100);
        let view = registry.attach(ViewKind::Listing, listing(movies)).await;
        view.reset().await;

        let top = ScrollPosition {
            viewport_height: 1000.0,
            scroll_y: 0.0,
            document_height: 5000.0,
        };
        let update = view.scroll(&top, 100.0).await;
        assert_eq!(update.outcome, None);
        assert!(update.items.is_empty());
        assert_eq!(update.total, 20);
    }

    #[tokio::test]
    async fn test_retarget_replaces_items() {
        let movies: Arc<dyn MovieSource> =
            Arc::new(FakeMovies::new().with_popular_pages(2, 20).with_search("heat", 4));
        let registry = ViewRegistry::new(Duration::from_secs(60), 100);
        let view = registry.attach(ViewKind::Listing, listing(movies.clone())).await;
        view.reset().await;

        let keyword = SearchForm::new("heat").keyword().unwrap();
        let update = view
            .retarget(Arc::new(ListingFeed::search(movies, keyword)))
            .await;
        assert_eq!(update.total, 4);
        assert_eq!(update.state, FeedState::Ready);

        let snapshot = view.snapshot().await;
        assert_eq!(snapshot.source, "search");
        assert_eq!(snapshot.items.len(), 4);
    }

    #[tokio::test]
    async fn test_sweep_removes_idle_views() {
        let movies: Arc<dyn MovieSource> = Arc::new(FakeMovies::new());
        let registry = ViewRegistry::new(Duration::from_millis(20), 100);
        registry.attach(ViewKind::Listing, listing(movies.clone())).await;
        registry.attach(ViewKind::Recommendations, listing(movies)).await;
        assert_eq!(registry.len().await, 2);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(registry.sweep().await, 2);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_attach_evicts_least_recently_active() {
        let movies: Arc<dyn MovieSource> = Arc::new(FakeMovies::new());
        let registry = ViewRegistry::new(Duration::from_secs(3600), 2);

        let first = registry.attach(ViewKind::Listing, listing(movies.clone())).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = registry.attach(ViewKind::Listing, listing(movies.clone())).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        // Touching the first view makes the second the oldest.
        assert!(registry.get(&first.id).await.is_some());
        let third = registry.attach(ViewKind::Listing, listing(movies)).await;

        assert_eq!(registry.len().await, 2);
        assert!(registry.get(&first.id).await.is_some());
        assert!(registry.get(&second.id).await.is_none());
        assert!(registry.get(&third.id).await.is_some());
    }

    #[tokio::test]
    async fn test_zero_sweep_interval_does_not_stop_sweeping() {
        let movies: Arc<dyn MovieSource> = Arc::new(FakeMovies::new());
        let registry = Arc::new(ViewRegistry::new(Duration::from_millis(10), 100));
        registry.attach(ViewKind::Listing, listing(movies)).await;

        registry.clone().start_background_sweep(0);
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_active_views() {
        let movies: Arc<dyn MovieSource> = Arc::new(FakeMovies::new());
        let registry = ViewRegistry::new(Duration::from_secs(3600), 100);
        registry.attach(ViewKind::Listing, listing(movies)).await;
        assert_eq!(registry.sweep().await, 0);
        assert_eq!(registry.len().await, 1);
    }
}
