//! Core data types shared by the parsers, the channel store and the exporters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Duration value used by sources that do not carry one (live streams).
pub const LIVE_DURATION: i64 = -1;

/// One stream source for one channel.
///
/// Parsers emit records carrying the raw source name; the channel store
/// rewrites `name` to the canonical name when the record is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub name: String,
    pub url: String,
    pub duration: i64,
    #[serde(default)]
    pub tvg_name: String,
    #[serde(default)]
    pub tvg_logo: String,
    #[serde(default)]
    pub group_title: String,
    #[serde(default)]
    pub tvg_id: String,
    /// Attribute text as it appeared in the source, kept for diagnostics only
    #[serde(default)]
    pub raw_attributes: String,
}

impl ChannelRecord {
    /// Create a record with only a name and a URL; everything else defaults.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            duration: LIVE_DURATION,
            tvg_name: String::new(),
            tvg_logo: String::new(),
            group_title: String::new(),
            tvg_id: String::new(),
            raw_attributes: String::new(),
        }
    }

    /// A record is insertable only with both a name and a URL.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.url.is_empty()
    }
}

/// An ordered list of target channel names under one category title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCategory {
    pub title: String,
    pub channels: Vec<String>,
}

impl TemplateCategory {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            channels: Vec::new(),
        }
    }
}

/// Ordered categories controlling export order and filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub categories: Vec<TemplateCategory>,
}

impl Template {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn channel_count(&self) -> usize {
        self.categories.iter().map(|c| c.channels.len()).sum()
    }
}

/// Outcome of one subscription fetch.
#[derive(Debug, Clone)]
pub struct SubscriptionResult {
    pub url: String,
    pub channels: Vec<ChannelRecord>,
    pub failed: bool,
}

impl SubscriptionResult {
    /// Empty result for a subscription that could not be fetched.
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            channels: Vec::new(),
            failed: true,
        }
    }
}

/// Summary of a finished aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub subscription_count: usize,
    pub failed_subscriptions: usize,
    pub channel_count: usize,
    pub stream_count: usize,
    /// Streams emitted by the template export, `None` when no template was used
    pub template_matched_streams: Option<usize>,
    pub outputs_written: bool,
}
