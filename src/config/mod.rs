//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → DirectoryConfig (validated, immutable)
//!     → handed to HttpServer, which wires the upstream stack
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CacheConfig, DirectoryConfig, ListenerConfig, ObservabilityConfig, RetryConfig, TimeoutConfig,
    UpstreamConfig,
};
pub use validation::validate_config;
