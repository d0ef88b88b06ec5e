//! Read-through cache and aggregate queries in front of a rate-limited
//! employee directory API.

pub mod config;
pub mod directory;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::DirectoryConfig;
pub use directory::DirectoryService;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
