//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → retries.rs (execute, inspect status)
//!     → On 429: backoff.rs (exponential delay + jitter), sleep, resend
//!     → After max retries: hand back the last 429 untouched
//! ```
//!
//! # Design Decisions
//! - Only throttling (429) is retried; every other status passes through
//! - Connection failures and timeouts surface immediately
//! - Retry count is strictly capped so a caller never waits forever

pub mod backoff;
pub mod retries;

pub use retries::{RetryPolicy, RetryingTransport};
