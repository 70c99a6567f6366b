//! Paginated list controllers.
//!
//! A [`ListController`] owns the page number, search term and sort order of
//! one list screen and refetches from its [`ListSource`] whenever any of them
//! changes. Search input is debounced; every fetch carries a ticket from a
//! [`RequestGuard`] so a slow response for an old query never overwrites a
//! newer one. Sorting is always delegated to the server.

pub mod sources;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use casa_client::ApiError;
use casa_core::pagination::{clamp_page, total_pages, Page, PageRequest};
use casa_core::sorting::SortOrder;

use crate::debounce::Debouncer;
use crate::guard::RequestGuard;

pub use sources::{
    ClassAttendanceSource, ClassSource, ClassStudentsSource, StudentSource, UserSource,
};

pub type StudentList = ListController<StudentSource>;
pub type ClassList = ListController<ClassSource>;
pub type UserList = ListController<UserSource>;
pub type ClassStudentsList = ListController<ClassStudentsSource>;
pub type ClassAttendanceList = ListController<ClassAttendanceSource>;

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// One paginated backend collection.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Fixed page size of the screen.
    fn page_size(&self) -> u32;

    async fn fetch(
        &self,
        page: &PageRequest,
        search: &str,
        order: Option<SortOrder>,
    ) -> Result<Page<Self::Item>, ApiError>;
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing fetched yet.
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last fetch failed. Items from the previous fetch stay visible.
    Failed(String),
}

/// Snapshot of what a list screen renders.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    pub items: Vec<T>,
    /// 1-based current page.
    pub page: u32,
    pub total: u64,
    pub total_pages: u32,
    pub search: String,
    pub order: Option<SortOrder>,
    pub status: ListStatus,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total: 0,
            total_pages: 0,
            search: String::new(),
            order: None,
            status: ListStatus::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch superseded this one; its response was dropped.
    Discarded,
    Failed,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

enum Fetched {
    Done(FetchOutcome),
    /// The requested page is beyond the server's total; carries the last page.
    PastEnd(u32),
}

struct Shared<T> {
    view: ListView<T>,
    guard: RequestGuard,
}

struct Inner<S: ListSource> {
    source: S,
    state: RwLock<Shared<S::Item>>,
    debouncer: Debouncer,
}

/// Cheap to clone; clones share state.
pub struct ListController<S: ListSource> {
    inner: Arc<Inner<S>>,
}

impl<S: ListSource> Clone for ListController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S, search_debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                state: RwLock::new(Shared {
                    view: ListView::default(),
                    guard: RequestGuard::new(),
                }),
                debouncer: Debouncer::new(search_debounce),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub async fn view(&self) -> ListView<S::Item> {
        self.inner.state.read().await.view.clone()
    }

    pub async fn status(&self) -> ListStatus {
        self.inner.state.read().await.view.status.clone()
    }

    /// Fetch the current page with the current filters.
    pub async fn refresh(&self) -> FetchOutcome {
        let page = self.inner.state.read().await.view.page;
        self.load(page).await
    }

    /// Fetch `page` and make it current once the response is applied. If the
    /// total shrank below `page`, the last page that still exists is fetched
    /// instead.
    async fn load(&self, page: u32) -> FetchOutcome {
        match self.fetch_page(page, true).await {
            Fetched::Done(outcome) => outcome,
            Fetched::PastEnd(last) => {
                tracing::debug!(page, last, "Page no longer exists, loading last page");
                match self.fetch_page(last, false).await {
                    Fetched::Done(outcome) => outcome,
                    Fetched::PastEnd(_) => FetchOutcome::Discarded,
                }
            }
        }
    }

    async fn fetch_page(&self, page: u32, reclamp: bool) -> Fetched {
        let page_size = self.inner.source.page_size();
        let (ticket, request, search, order) = {
            let mut state = self.inner.state.write().await;
            let request = match PageRequest::new(page, page_size) {
                Ok(request) => request,
                Err(e) => {
                    state.view.status = ListStatus::Failed(e.to_string());
                    return Fetched::Done(FetchOutcome::Failed);
                }
            };
            state.view.status = ListStatus::Loading;
            (
                state.guard.issue(),
                request,
                state.view.search.clone(),
                state.view.order,
            )
        };

        let result = ticket
            .run(self.inner.source.fetch(&request, &search, order))
            .await;

        let mut state = self.inner.state.write().await;
        if !state.guard.is_current(&ticket) {
            tracing::debug!(generation = ticket.generation(), "Discarding stale list response");
            return Fetched::Done(FetchOutcome::Discarded);
        }
        match result {
            Err(_) => Fetched::Done(FetchOutcome::Discarded),
            Ok(Ok(page_data)) => {
                let pages = total_pages(page_data.total, page_size);
                let last = pages.max(1);
                if reclamp && page > last {
                    return Fetched::PastEnd(last);
                }
                state.view.page = page;
                state.view.total = page_data.total;
                state.view.total_pages = pages;
                state.view.items = page_data.data;
                state.view.status = ListStatus::Ready;
                Fetched::Done(FetchOutcome::Applied)
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    page = request.page(),
                    search = %search,
                    error = %e,
                    "List fetch failed",
                );
                state.view.status = ListStatus::Failed(e.user_message());
                Fetched::Done(FetchOutcome::Failed)
            }
        }
    }

    /// Jump to `page`, clamped to the known page range once a fetch landed.
    /// The page number only changes when the fetch succeeds.
    pub async fn go_to_page(&self, page: u32) -> FetchOutcome {
        let target = {
            let state = self.inner.state.read().await;
            match state.view.status {
                ListStatus::Idle => page.max(1),
                _ => clamp_page(page, state.view.total_pages),
            }
        };
        self.load(target).await
    }

    pub async fn next_page(&self) -> FetchOutcome {
        let page = self.inner.state.read().await.view.page;
        self.go_to_page(page.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> FetchOutcome {
        let page = self.inner.state.read().await.view.page;
        self.go_to_page(page.saturating_sub(1)).await
    }

    /// Record a keystroke in the search box. The refetch (back on page 1)
    /// fires once input has been quiet for the debounce period.
    pub async fn set_search(&self, term: &str) {
        self.inner.state.write().await.view.search = term.to_string();
        let this = self.clone();
        self.inner
            .debouncer
            .call(async move {
                this.load(1).await;
            })
            .await;
    }

    /// Apply a search immediately, dropping any pending debounced fetch.
    pub async fn search_now(&self, term: &str) -> FetchOutcome {
        self.inner.debouncer.cancel().await;
        self.inner.state.write().await.view.search = term.to_string();
        self.load(1).await
    }

    /// Change the server-side sort order and go back to page 1.
    pub async fn set_sort(&self, order: Option<SortOrder>) -> FetchOutcome {
        self.inner.state.write().await.view.order = order;
        self.load(1).await
    }

    /// Flip between ascending and descending (ascending first).
    pub async fn toggle_sort(&self) -> FetchOutcome {
        let current = self.inner.state.read().await.view.order;
        self.set_sort(Some(current.map_or(SortOrder::Asc, SortOrder::reversed)))
            .await
    }

    /// Stop any pending or in-flight fetch, e.g. when the screen closes.
    pub async fn cancel(&self) {
        self.inner.debouncer.cancel().await;
        self.inner.state.write().await.guard.invalidate();
    }
}
