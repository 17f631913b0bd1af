//! Shared Context
//!
//! A thread-safe key/value container backed by a [`dashmap::DashMap`].
//! Values may be "null" (`None`), handles can be mirrored so that several
//! owners see the same backing map, and entries can be bulk-copied between
//! independent contexts.

pub mod config;
pub mod context;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::ContextConfig;
pub use context::{Context, Entry, SimpleContext, Value};
pub use error::{ConfigError, ContextError, Result};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
