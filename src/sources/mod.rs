//! Subscription format parsers
//!
//! A subscription body is either an extended M3U playlist or a flat
//! `name,url` text list. Both parsers are total: malformed input yields
//! fewer (possibly zero) records, never an error.
//!
//! # Usage
//!
//! ```rust
//! use iptv_aggregator::sources::parse_subscription;
//!
//! let records = parse_subscription("CCTV1,http://example.com/cctv1.m3u8\n");
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].name, "CCTV1");
//! ```

pub mod m3u;
pub mod txt;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ChannelRecord;

pub use m3u::M3uParser;
pub use txt::TxtParser;

/// Wire format of a subscription body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionFormat {
    M3u,
    Txt,
}

impl SubscriptionFormat {
    /// Classify a raw body. Any `#EXTM3U` or `#EXTINF:` marker anywhere in the
    /// text selects the playlist parser.
    pub fn detect(content: &str) -> Self {
        if content.contains("#EXTM3U") || content.contains("#EXTINF:") {
            Self::M3u
        } else {
            Self::Txt
        }
    }
}

impl fmt::Display for SubscriptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionFormat::M3u => write!(f, "m3u"),
            SubscriptionFormat::Txt => write!(f, "txt"),
        }
    }
}

/// Converts a raw subscription body into channel records.
pub trait PlaylistParser: Send + Sync {
    fn format(&self) -> SubscriptionFormat;

    /// Parse the whole body, preserving source order.
    fn parse(&self, content: &str) -> Vec<ChannelRecord>;
}

/// Picks the parser matching a body's format
pub struct ParserFactory;

impl ParserFactory {
    pub fn for_format(format: SubscriptionFormat) -> &'static dyn PlaylistParser {
        match format {
            SubscriptionFormat::M3u => &M3uParser,
            SubscriptionFormat::Txt => &TxtParser,
        }
    }

    pub fn for_content(content: &str) -> &'static dyn PlaylistParser {
        Self::for_format(SubscriptionFormat::detect(content))
    }
}

/// Classify and parse a subscription body in one step.
pub fn parse_subscription(content: &str) -> Vec<ChannelRecord> {
    ParserFactory::for_content(content).parse(content)
}
