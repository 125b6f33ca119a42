//! Paginator implementation

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::{
    DisplayState, NavigationOutcome, PagerAction, PagerSnapshot, PagerStatus, PagingSubscriber,
    PaginatorOptions, PositionCache, PositionKey,
};
use crate::data::{FetchRequest, PageWindow, SortRequest, ViewDataSource};
use crate::PagerError;

/// Paging state stored internally
#[derive(Debug)]
struct PagerState {
    current_start: PositionKey,
    active_page: PositionKey,
    page_size: usize,
    last_action: Option<PagerAction>,
    total_count: usize,
    last_window: Option<PageWindow>,
    status: PagerStatus,
    sort: Option<SortRequest>,
    cache: PositionCache,
    /// Sequence number of the most recently issued request
    issued: u64,
}

/// Change to the position cache made once a response is applied
#[derive(Debug, Clone, PartialEq, Eq)]
enum CacheEffect {
    Keep,
    Push {
        boundary: PositionKey,
        previous_start: PositionKey,
    },
    Truncate(usize),
    Clear,
}

/// A request that has been issued but not yet answered
struct PendingFetch {
    seq: u64,
    action: PagerAction,
    request: FetchRequest,
    cache: CacheEffect,
}

impl PagerState {
    fn begin(&mut self, action: PagerAction, start: Option<PositionKey>, cache: CacheEffect) -> PendingFetch {
        self.issued += 1;
        self.status = PagerStatus::Loading;
        self.last_action = Some(action);
        PendingFetch {
            seq: self.issued,
            action,
            request: FetchRequest {
                start,
                count: self.page_size,
                sort: self.sort.clone(),
            },
            cache,
        }
    }

    fn apply(&mut self, pending: PendingFetch, window: PageWindow) {
        match pending.cache {
            CacheEffect::Keep => {}
            CacheEffect::Push { boundary, previous_start } => self.cache.push(boundary, previous_start),
            CacheEffect::Truncate(index) => self.cache.truncate(index),
            CacheEffect::Clear => self.cache.clear(),
        }

        let request = &pending.request;
        match &request.start {
            Some(start) => {
                self.current_start = start.clone();
                self.active_page = window
                    .first_boundary()
                    .cloned()
                    .unwrap_or_else(|| start.clone());
            }
            None => {
                // A start-less request comes from a resort; paging starts over
                self.current_start = PositionKey::first();
                self.active_page = PositionKey::first();
            }
        }
        self.total_count = window.total_count;
        self.last_window = Some(window);
        self.status = PagerStatus::Loaded;
    }

    fn is_categorized(&self) -> bool {
        self.last_window.as_ref().map_or(false, |w| w.is_categorized)
    }

    /// Start of the final page, computed from the last known total
    fn last_page_start(&self) -> PositionKey {
        let total = self.total_count;
        let size = self.page_size.max(1);
        let start = if self.is_categorized() {
            total
        } else {
            let extra = total % size;
            if extra != 0 {
                total - extra
            } else {
                total.saturating_sub(size)
            }
        };
        PositionKey::from_index(start.max(1))
    }
}

/// Hierarchical paginator over a [`ViewDataSource`]
pub struct Paginator {
    source: Arc<dyn ViewDataSource>,
    options: PaginatorOptions,
    state: Mutex<PagerState>,
    subscribers: RwLock<Vec<Weak<dyn PagingSubscriber>>>,
}

impl Paginator {
    /// Create a new paginator. A page size of zero is raised to one.
    pub fn new(source: Arc<dyn ViewDataSource>, options: PaginatorOptions) -> Self {
        let state = PagerState {
            current_start: PositionKey::first(),
            active_page: PositionKey::first(),
            page_size: options.page_size.max(1),
            last_action: None,
            total_count: 0,
            last_window: None,
            status: PagerStatus::Idle,
            sort: None,
            cache: PositionCache::new(),
            issued: 0,
        };

        Self {
            source,
            options,
            state: Mutex::new(state),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Load the first page
    pub async fn first(&self) -> Result<NavigationOutcome, PagerError> {
        let pending = self
            .state
            .lock()
            .begin(PagerAction::First, Some(PositionKey::first()), CacheEffect::Keep);
        self.dispatch(pending).await
    }

    /// Step back one page, using the position cache when it knows the way
    pub async fn previous(&self) -> Result<NavigationOutcome, PagerError> {
        let pending = {
            let mut state = self.state.lock();
            let prior = state.last_action;
            let boundary = state
                .last_window
                .as_ref()
                .and_then(PageWindow::first_boundary)
                .cloned()
                .unwrap_or_else(|| state.current_start.clone());

            let (start, cache) = match state.cache.lookup(&boundary) {
                Some(hit) if hit.index == 0 => (PositionKey::first(), CacheEffect::Truncate(0)),
                Some(hit) => (hit.previous_start, CacheEffect::Truncate(hit.index)),
                // Best effort: after a jump to the end the last recorded
                // forward step is the closest known page
                None if prior == Some(PagerAction::Last) => {
                    let start = state
                        .cache
                        .last()
                        .map(|(boundary, _)| boundary.clone())
                        .unwrap_or_else(PositionKey::first);
                    (start, CacheEffect::Keep)
                }
                None => {
                    debug!(%boundary, "position cache miss, restarting from the top");
                    (PositionKey::first(), CacheEffect::Clear)
                }
            };

            state.begin(PagerAction::Previous, Some(start), cache)
        };
        self.dispatch(pending).await
    }

    /// Advance one page, starting from the last navigable entry of the current window
    pub async fn next(&self) -> Result<NavigationOutcome, PagerError> {
        let pending = {
            let mut state = self.state.lock();
            let boundary = state
                .last_window
                .as_ref()
                .and_then(PageWindow::last_boundary)
                .cloned();

            let (start, cache) = match boundary {
                Some(boundary) => {
                    let cache = CacheEffect::Push {
                        boundary: boundary.clone(),
                        previous_start: state.current_start.clone(),
                    };
                    (boundary, cache)
                }
                None => (PositionKey::first(), CacheEffect::Keep),
            };

            state.begin(PagerAction::Next, Some(start), cache)
        };
        self.dispatch(pending).await
    }

    /// Jump to the final page
    pub async fn last(&self) -> Result<NavigationOutcome, PagerError> {
        let pending = {
            let mut state = self.state.lock();
            let start = state.last_page_start();
            state.begin(PagerAction::Last, Some(start), CacheEffect::Keep)
        };
        self.dispatch(pending).await
    }

    /// Reload the current page
    pub async fn refresh(&self) -> Result<NavigationOutcome, PagerError> {
        let pending = {
            let mut state = self.state.lock();
            let start = state.current_start.clone();
            state.begin(PagerAction::Refresh, Some(start), CacheEffect::Keep)
        };
        self.dispatch(pending).await
    }

    /// Jump to an arbitrary position such as `"3.2.1"`
    pub async fn jump_to(&self, position: &str) -> Result<NavigationOutcome, PagerError> {
        let start = PositionKey::parse(position)?;
        let pending = self
            .state
            .lock()
            .begin(PagerAction::Jump, Some(start), CacheEffect::Clear);
        self.dispatch(pending).await
    }

    /// Resort the view remotely and start paging over from the top.
    ///
    /// `None` restores the view's natural order.
    pub async fn resort(&self, sort: Option<SortRequest>) -> Result<NavigationOutcome, PagerError> {
        let pending = {
            let mut state = self.state.lock();
            state.sort = sort;
            state.begin(PagerAction::Resort, None, CacheEffect::Clear)
        };
        self.dispatch(pending).await
    }

    /// Change the number of entries requested by later fetches
    pub fn set_page_size(&self, page_size: usize) -> Result<(), PagerError> {
        if page_size == 0 {
            return Err(PagerError::InvalidPageSize(page_size));
        }
        self.state.lock().page_size = page_size;
        Ok(())
    }

    pub fn status(&self) -> PagerStatus {
        self.state.lock().status
    }

    pub fn current_start(&self) -> PositionKey {
        self.state.lock().current_start.clone()
    }

    /// Number of forward steps currently recorded for backward navigation
    pub fn cached_steps(&self) -> usize {
        self.state.lock().cache.len()
    }

    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    /// Get the current paging state
    pub fn snapshot(&self) -> PagerSnapshot {
        let state = self.state.lock();
        self.snapshot_of(&state)
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn PagingSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn snapshot_of(&self, state: &PagerState) -> PagerSnapshot {
        let display = DisplayState::derive(
            state.last_window.as_ref(),
            &state.current_start,
            state.total_count,
            &self.options.labels,
        );

        PagerSnapshot {
            status: state.status,
            current_start: state.current_start.clone(),
            active_page: state.active_page.clone(),
            page_size: state.page_size,
            total_count: state.total_count,
            last_action: state.last_action,
            window: state.last_window.clone(),
            display,
        }
    }

    /// Issue the fetch and apply its result if no newer request was issued meanwhile
    async fn dispatch(&self, pending: PendingFetch) -> Result<NavigationOutcome, PagerError> {
        debug!(
            seq = pending.seq,
            action = ?pending.action,
            start = ?pending.request.start.as_ref().map(|s| s.to_string()),
            count = pending.request.count,
            source = self.source.source_name(),
            "fetching page"
        );

        let result = self.source.fetch(&pending.request).await;
        let (seq, action) = (pending.seq, pending.action);

        let applied = {
            let mut state = self.state.lock();
            if seq != state.issued {
                debug!(seq, latest = state.issued, "discarding response of superseded request");
                return Ok(NavigationOutcome::Superseded { request: seq });
            }

            match result {
                Ok(window) => {
                    state.apply(pending, window);
                    Ok(self.snapshot_of(&state))
                }
                Err(error) => {
                    state.status = PagerStatus::Error;
                    Err(error)
                }
            }
        };

        match applied {
            Ok(snapshot) => {
                info!(
                    start = %snapshot.current_start,
                    entries = snapshot.window.as_ref().map_or(0, PageWindow::len),
                    total = snapshot.total_count,
                    "page loaded"
                );
                self.notify_change(&snapshot);
                Ok(NavigationOutcome::Applied(snapshot))
            }
            Err(error) => {
                warn!(error = %format!("{error:#}"), ?action, "page fetch failed");
                self.notify_error(&format!("{error:#}"));
                Err(PagerError::Fetch(error))
            }
        }
    }

    fn live_subscribers(&self) -> Vec<Arc<dyn PagingSubscriber>> {
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);
        subscribers.iter().filter_map(Weak::upgrade).collect()
    }

    fn notify_change(&self, snapshot: &PagerSnapshot) {
        for subscriber in self.live_subscribers() {
            subscriber.on_page_change(snapshot);
        }
    }

    fn notify_error(&self, message: &str) {
        for subscriber in self.live_subscribers() {
            subscriber.on_page_error(message);
        }
    }
}
