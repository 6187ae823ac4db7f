//! Centralized error handling for the IPTV aggregator
//!
//! Errors are grouped by where they originate:
//!
//! - **Source Errors**: subscription fetch and decode failures
//! - **Web Errors**: HTTP request handling issues (auth, headers)
//! - **Validation Errors**: input files rejected by the validation pass
//! - **I/O Errors**: disk access while loading inputs or writing outputs
//!
//! Fetch and parse failures are normally contained where they happen and
//! turned into an empty result plus a log line. Only disk failures and
//! refused runs reach the caller as an [`AppError`].
//!
//! # Usage
//!
//! ```rust
//! use iptv_aggregator::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::validation("template has no categories"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
