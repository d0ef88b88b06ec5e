//! Employee directory subsystem.
//!
//! # Data Flow
//! ```text
//! Reads (search, highest salary, top earners):
//!     service.rs → cache.rs (snapshot hit, or one coalesced fetch)
//!         → client.rs list_employees → RetryingTransport → upstream
//!
//! Writes (create, delete):
//!     service.rs → client.rs → RetryingTransport → upstream
//!         → cache.rs invalidate()
//! ```
//!
//! # Design Decisions
//! - The client swallows upstream trouble; the service surfaces only
//!   business outcomes (`DirectoryError`)
//! - Caching is a capability (`SnapshotSource`) chosen at wiring time
//! - Top-K uses a bounded heap rather than sorting the snapshot

pub mod cache;
pub mod client;
pub mod error;
pub mod service;
pub mod top_k;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheStatus, DirectorySnapshotCache, PassThroughSource, SnapshotSource};
pub use client::{DirectoryClient, EmployeeDirectory};
pub use error::{DirectoryError, DirectoryResult, UpstreamError};
pub use service::{DirectoryService, TOP_EARNERS};
pub use top_k::select_top_k;
pub use types::{DirectorySnapshot, Employee, EmployeeCreateRequest};
