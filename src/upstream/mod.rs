//! Upstream HTTP plumbing.
//!
//! # Data Flow
//! ```text
//! DirectoryClient
//!     → UpstreamRequest (method, url, optional JSON body)
//!     → resilience::retries::RetryingTransport (429 → backoff → retry)
//!     → transport.rs HttpTransport (reqwest, connect/request timeouts)
//!     → UpstreamResponse (status + raw body)
//! ```
//!
//! # Design Decisions
//! - Requests are plain values so a retry can resend them without cloning streams
//! - Non-2xx statuses are data, not errors; only I/O failures become `TransportError`
//! - The `Transport` trait is the seam tests use to script upstream behavior

pub mod transport;

pub use transport::{HttpTransport, Transport, TransportError, UpstreamRequest, UpstreamResponse};
