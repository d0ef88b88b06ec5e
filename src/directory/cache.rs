//! Read-through snapshot of the full employee collection.
//!
//! # Responsibilities
//! - Serve the last fetched collection until it is invalidated
//! - Coalesce concurrent misses into a single upstream `list_employees` call
//! - Mark the snapshot stale on `invalidate()` without blocking
//!
//! # Design Decisions
//! - Single-flight via a mutex-guarded shared future: the first caller to see
//!   a miss installs the fetch, everyone else awaits a clone of it
//! - Every invalidation bumps a generation; a miss only joins a fetch started
//!   under the current generation, so a post-invalidation read always
//!   triggers its own fetch
//! - A fetch that finishes after a newer invalidation still answers its own
//!   waiters but does not overwrite the snapshot
//! - An empty collection is a valid snapshot, distinct from "never fetched"
//! - Holds one unsharded collection; sized for hundreds to low thousands of records

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;

use crate::directory::client::EmployeeDirectory;
use crate::directory::types::DirectorySnapshot;
use crate::observability::metrics;

/// Where the service reads the full collection from.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// The current collection. Never fails; upstream trouble yields an empty snapshot.
    async fn get_all(&self) -> Arc<DirectorySnapshot>;

    /// Forget the current collection so the next read goes upstream.
    fn invalidate(&self);

    /// Cache bookkeeping, for sources that cache.
    fn status(&self) -> Option<CacheStatus> {
        None
    }
}

/// Point-in-time view of the cache for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub populated: bool,
    pub stale: bool,
    pub records: usize,
    pub age_secs: Option<u64>,
    pub generation: u64,
    pub fetch_in_flight: bool,
    pub upstream_fetches: u64,
}

type SnapshotFetch = Shared<BoxFuture<'static, Arc<DirectorySnapshot>>>;

struct InFlight {
    generation: u64,
    fetch: SnapshotFetch,
}

struct Cached {
    generation: u64,
    snapshot: Arc<DirectorySnapshot>,
}

#[derive(Default)]
struct CacheState {
    generation: u64,
    current: Option<Cached>,
    in_flight: Option<InFlight>,
}

impl CacheState {
    fn fresh(&self) -> Option<Arc<DirectorySnapshot>> {
        self.current
            .as_ref()
            .filter(|c| c.generation == self.generation)
            .map(|c| c.snapshot.clone())
    }

    fn joinable(&self) -> Option<SnapshotFetch> {
        self.in_flight
            .as_ref()
            .filter(|f| f.generation == self.generation)
            .map(|f| f.fetch.clone())
    }
}

/// Single-flight cache over [`EmployeeDirectory::list_employees`].
pub struct DirectorySnapshotCache {
    directory: Arc<dyn EmployeeDirectory>,
    state: Arc<Mutex<CacheState>>,
    fetches: Arc<AtomicU64>,
}

impl DirectorySnapshotCache {
    pub fn new(directory: Arc<dyn EmployeeDirectory>) -> Self {
        Self {
            directory,
            state: Arc::new(Mutex::new(CacheState::default())),
            fetches: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of upstream fetches started so far.
    pub fn upstream_fetches(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Build the shared fetch for `generation`. Runs only when first polled.
    fn start_fetch(&self, generation: u64) -> SnapshotFetch {
        let directory = self.directory.clone();
        let state: Weak<Mutex<CacheState>> = Arc::downgrade(&self.state);
        let fetches = self.fetches.clone();

        async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            metrics::record_snapshot_fetch();
            tracing::debug!(generation, "Fetching employee snapshot from upstream");

            let snapshot = Arc::new(DirectorySnapshot::new(directory.list_employees().await));

            if let Some(state) = state.upgrade() {
                let mut state = state.lock();
                if state.generation == generation {
                    state.current = Some(Cached {
                        generation,
                        snapshot: snapshot.clone(),
                    });
                } else {
                    tracing::debug!(
                        generation,
                        current = state.generation,
                        "Snapshot invalidated during fetch, not storing"
                    );
                }
                if state.in_flight.as_ref().is_some_and(|f| f.generation == generation) {
                    state.in_flight = None;
                }
            }

            tracing::info!(records = snapshot.len(), generation, "Employee snapshot fetched");
            snapshot
        }
        .boxed()
        .shared()
    }
}

#[async_trait]
impl SnapshotSource for DirectorySnapshotCache {
    async fn get_all(&self) -> Arc<DirectorySnapshot> {
        let fetch = {
            let mut state = self.state.lock();

            if let Some(snapshot) = state.fresh() {
                metrics::record_cache_lookup("hit");
                return snapshot;
            }

            match state.joinable() {
                Some(fetch) => {
                    metrics::record_cache_lookup("joined");
                    fetch
                }
                None => {
                    metrics::record_cache_lookup("miss");
                    let generation = state.generation;
                    let fetch = self.start_fetch(generation);
                    state.in_flight = Some(InFlight {
                        generation,
                        fetch: fetch.clone(),
                    });
                    fetch
                }
            }
        };

        fetch.await
    }

    fn invalidate(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        tracing::debug!(generation = state.generation, "Employee snapshot invalidated");
    }

    fn status(&self) -> Option<CacheStatus> {
        let state = self.state.lock();
        let current = state.current.as_ref();
        Some(CacheStatus {
            populated: current.is_some(),
            stale: current.is_some_and(|c| c.generation != state.generation),
            records: current.map_or(0, |c| c.snapshot.len()),
            age_secs: current.map(|c| c.snapshot.age().as_secs()),
            generation: state.generation,
            fetch_in_flight: state.in_flight.is_some(),
            upstream_fetches: self.upstream_fetches(),
        })
    }
}

/// Uncached source: every read is an upstream call.
pub struct PassThroughSource {
    directory: Arc<dyn EmployeeDirectory>,
}

impl PassThroughSource {
    pub fn new(directory: Arc<dyn EmployeeDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl SnapshotSource for PassThroughSource {
    async fn get_all(&self) -> Arc<DirectorySnapshot> {
        metrics::record_snapshot_fetch();
        Arc::new(DirectorySnapshot::new(self.directory.list_employees().await))
    }

    fn invalidate(&self) {}
}
