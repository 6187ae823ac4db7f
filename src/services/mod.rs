//! Aggregation services
//!
//! The channel store and template matcher hold the core merge and lookup
//! rules; the aggregation service wires inputs, fetching and export into a
//! single run, and the run coordinator keeps runs from overlapping.

pub mod aggregation;
pub mod channel_store;
pub mod matcher;
pub mod run_coordinator;

pub use aggregation::AggregationService;
pub use channel_store::{ChannelStore, InsertOutcome};
pub use matcher::{ChannelMatch, MatchTier, TemplateMatcher};
pub use run_coordinator::{RunCoordinator, RunGuard, RunSnapshot, RunState, RunStatus};
