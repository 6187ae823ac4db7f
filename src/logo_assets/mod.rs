//! Channel logo fallbacks
//!
//! Logo list lines are `channelName,logoURL[,...]`; only the first two fields
//! matter. Lookups are by exact channel name and are consulted only when a
//! stream record carries no `tvg-logo` of its own.

use std::collections::HashMap;
use tracing::{debug, warn};

/// Canonical channel name → logo URL
#[derive(Debug, Clone, Default)]
pub struct LogoTable {
    logos: HashMap<String, String>,
}

impl LogoTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse logo list text. Malformed lines are skipped with a warning.
    pub fn parse(content: &str) -> Self {
        let mut table = Self::new();

        for (line_num, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split(',').map(str::trim);
            match (parts.next(), parts.next()) {
                (Some(name), Some(logo)) => table.insert(name, logo),
                _ => warn!(line = line_num + 1, content = line, "Logo line is missing a logo URL"),
            }
        }

        debug!(logo_count = table.len(), "Logo table parsed");
        table
    }

    pub fn insert(&mut self, channel_name: &str, logo_url: &str) {
        self.logos
            .insert(channel_name.to_string(), logo_url.to_string());
    }

    pub fn get(&self, channel_name: &str) -> Option<&str> {
        self.logos.get(channel_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.logos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logos.is_empty()
    }
}
