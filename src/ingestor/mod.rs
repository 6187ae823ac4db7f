//! Subscription ingestion
//!
//! Downloads every subscription URL concurrently and parses each body into
//! channel records. Failures are isolated per URL.

pub mod subscription;

pub use subscription::SubscriptionFetcher;
