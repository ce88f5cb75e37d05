use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::core::GraphLayout;
use crate::session::{CommitSource, PageRequest, Session, SessionError};

/// What a load request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was applied; `added` commits were new
    Loaded { added: usize },
    /// Another load for this generation is still in flight
    Busy,
    /// The source reported no further pages
    Exhausted,
    /// The session was reset while the page was in flight; page dropped
    Stale,
}

struct Shared {
    session: Session,
    /// Generation of the load currently in flight
    in_flight: Option<u64>,
}

/// Drives a [`Session`] from a [`CommitSource`], one page at a time.
///
/// Loads are serialized: `load_more` while a load is in flight returns
/// [`LoadOutcome::Busy`]. The lock is never held across the fetch.
pub struct Paginator<S> {
    source: S,
    page_size: usize,
    shared: Mutex<Shared>,
}

/// Clears the in-flight marker when a load finishes, fails or is dropped.
struct InFlight<'a> {
    shared: &'a Mutex<Shared>,
    generation: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        if shared.in_flight == Some(self.generation) {
            shared.in_flight = None;
        }
    }
}

impl<S: CommitSource> Paginator<S> {
    pub fn new(source: S, page_size: usize) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            shared: Mutex::new(Shared {
                session: Session::new(),
                in_flight: None,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Snapshot of the current layout
    pub fn layout(&self) -> GraphLayout {
        self.lock().session.layout().clone()
    }

    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.lock().session)
    }

    pub fn is_loading(&self) -> bool {
        let shared = self.lock();
        shared.in_flight == Some(shared.session.generation())
    }

    /// Clear everything. A load still in flight will be discarded.
    pub fn reset(&self) {
        let mut shared = self.lock();
        shared.session.reset();
        shared.in_flight = None;
    }

    /// Reload from the first page. The current commits stay until the new
    /// page arrives; a failed fetch leaves them in place.
    pub async fn refresh(&self) -> Result<LoadOutcome, SessionError> {
        let generation = {
            let mut shared = self.lock();
            shared.session.invalidate();
            let generation = shared.session.generation();
            shared.in_flight = Some(generation);
            generation
        };

        self.fetch_and_apply(generation, 0, false).await
    }

    /// Load the page at the current cursor and append it
    pub async fn load_more(&self) -> Result<LoadOutcome, SessionError> {
        let (generation, offset) = {
            let mut shared = self.lock();
            let generation = shared.session.generation();
            if shared.in_flight == Some(generation) {
                debug!(repository = self.source.repository(), "load already in flight");
                return Ok(LoadOutcome::Busy);
            }
            if !shared.session.has_more() {
                return Ok(LoadOutcome::Exhausted);
            }
            shared.in_flight = Some(generation);
            (generation, shared.session.cursor())
        };

        self.fetch_and_apply(generation, offset, true).await
    }

    async fn fetch_and_apply(
        &self,
        generation: u64,
        offset: usize,
        append: bool,
    ) -> Result<LoadOutcome, SessionError> {
        let _in_flight = InFlight {
            shared: &self.shared,
            generation,
        };
        let request = PageRequest {
            limit: self.page_size,
            offset,
        };

        let page = match self.source.fetch_page(request).await {
            Ok(page) => page,
            Err(source) => {
                warn!(
                    repository = self.source.repository(),
                    offset,
                    error = %source,
                    "commit page fetch failed"
                );
                return Err(SessionError::Fetch {
                    repository: self.source.repository().to_string(),
                    offset,
                    source,
                });
            }
        };

        let mut shared = self.lock();
        if shared.session.generation() != generation {
            debug!(
                repository = self.source.repository(),
                offset,
                "discarding page from before reset"
            );
            return Ok(LoadOutcome::Stale);
        }

        let added = shared.session.load_page(page, append);
        Ok(LoadOutcome::Loaded { added })
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Commit;
    use crate::layout::compute_layout;
    use crate::session::{MemorySource, Page};
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn commit(hash: &str, parents: &[&str]) -> Commit {
        Commit::new(
            hash.to_string(),
            parents.iter().map(|p| p.to_string()).collect(),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            "Test".to_string(),
            String::new(),
        )
    }

    fn history() -> Vec<Commit> {
        vec![
            commit("F", &["M"]),
            commit("G", &["M"]),
            commit("M", &["A", "B"]),
            commit("A", &["R"]),
            commit("B", &["R"]),
            commit("R", &[]),
        ]
    }

    /// Holds every fetch until the gate is opened
    struct GatedSource {
        inner: MemorySource,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl CommitSource for GatedSource {
        fn repository(&self) -> &str {
            "gated"
        }

        async fn fetch_page(&self, request: PageRequest) -> Result<Page> {
            self.gate.notified().await;
            self.inner.fetch_page(request).await
        }
    }

    /// Fails while `failing` is set
    struct FlakySource {
        inner: MemorySource,
        failing: AtomicBool,
    }

    #[async_trait]
    impl CommitSource for FlakySource {
        fn repository(&self) -> &str {
            "flaky"
        }

        async fn fetch_page(&self, request: PageRequest) -> Result<Page> {
            if self.failing.load(Ordering::SeqCst) {
                bail!("connection reset");
            }
            self.inner.fetch_page(request).await
        }
    }

    #[tokio::test]
    async fn pages_until_exhausted() {
        let paginator = Paginator::new(MemorySource::new("mem", history()), 4);

        assert_eq!(paginator.refresh().await.unwrap(), LoadOutcome::Loaded { added: 4 });
        assert!(paginator.with_session(Session::has_more));
        assert_eq!(paginator.load_more().await.unwrap(), LoadOutcome::Loaded { added: 2 });
        assert_eq!(paginator.load_more().await.unwrap(), LoadOutcome::Exhausted);

        assert_eq!(paginator.layout(), compute_layout(&history()));
        assert_eq!(paginator.with_session(Session::cursor), 6);
    }

    #[tokio::test]
    async fn load_more_from_empty_session_starts_at_zero() {
        let paginator = Paginator::new(MemorySource::new("mem", history()), 10);
        assert_eq!(paginator.load_more().await.unwrap(), LoadOutcome::Loaded { added: 6 });
        assert_eq!(paginator.load_more().await.unwrap(), LoadOutcome::Exhausted);
    }

    #[tokio::test]
    async fn concurrent_load_is_rejected() {
        let gate = Arc::new(Notify::new());
        let paginator = Paginator::new(
            GatedSource {
                inner: MemorySource::new("mem", history()),
                gate: gate.clone(),
            },
            3,
        );

        let (first, second) = tokio::join!(paginator.load_more(), async {
            // let the first load reach the gate
            tokio::task::yield_now().await;
            let outcome = paginator.load_more().await;
            gate.notify_one();
            outcome
        });

        assert_eq!(first.unwrap(), LoadOutcome::Loaded { added: 3 });
        assert_eq!(second.unwrap(), LoadOutcome::Busy);
        assert!(!paginator.is_loading());
    }

    #[tokio::test]
    async fn reset_discards_in_flight_page() {
        let gate = Arc::new(Notify::new());
        let paginator = Paginator::new(
            GatedSource {
                inner: MemorySource::new("mem", history()),
                gate: gate.clone(),
            },
            3,
        );

        let (outcome, ()) = tokio::join!(paginator.load_more(), async {
            tokio::task::yield_now().await;
            paginator.reset();
            gate.notify_one();
        });

        assert_eq!(outcome.unwrap(), LoadOutcome::Stale);
        assert!(paginator.layout().is_empty());
        assert_eq!(paginator.with_session(Session::generation), 1);
        assert!(!paginator.is_loading());
    }

    #[tokio::test]
    async fn fetch_failure_keeps_layout_and_allows_retry() {
        let paginator = Paginator::new(
            FlakySource {
                inner: MemorySource::new("mem", history()),
                failing: AtomicBool::new(false),
            },
            3,
        );
        paginator.refresh().await.unwrap();
        let before = paginator.layout();

        paginator.source().failing.store(true, Ordering::SeqCst);
        let err = paginator.load_more().await.unwrap_err();
        assert!(matches!(err, SessionError::Fetch { offset: 3, .. }));
        assert_eq!(paginator.layout(), before);
        assert!(!paginator.is_loading());

        paginator.source().failing.store(false, Ordering::SeqCst);
        assert_eq!(paginator.load_more().await.unwrap(), LoadOutcome::Loaded { added: 3 });
        assert_eq!(paginator.layout(), compute_layout(&history()));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_loaded_history() {
        let paginator = Paginator::new(
            FlakySource {
                inner: MemorySource::new("mem", history()),
                failing: AtomicBool::new(false),
            },
            2,
        );
        paginator.refresh().await.unwrap();
        paginator.load_more().await.unwrap();
        let before = paginator.layout();
        assert_eq!(before.len(), 4);

        paginator.source().failing.store(true, Ordering::SeqCst);
        let err = paginator.refresh().await.unwrap_err();
        assert!(matches!(err, SessionError::Fetch { offset: 0, .. }));
        assert_eq!(paginator.layout(), before);
        assert_eq!(paginator.with_session(Session::cursor), 4);
        assert!(!paginator.is_loading());

        paginator.source().failing.store(false, Ordering::SeqCst);
        assert_eq!(paginator.refresh().await.unwrap(), LoadOutcome::Loaded { added: 2 });
        assert_eq!(paginator.layout(), compute_layout(&history()[..2]));
        assert_eq!(paginator.with_session(Session::cursor), 2);
    }
}
