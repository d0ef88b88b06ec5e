//! Lifecycle management.
//!
//! Startup is linear (config → logging → metrics → server, see `main.rs`);
//! shutdown is a broadcast that the server's graceful-shutdown future awaits.

pub mod shutdown;

pub use shutdown::Shutdown;
