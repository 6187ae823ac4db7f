//! Flat `name,url` subscription parser
//!
//! The first comma splits the name from the URL; everything after it is the
//! URL verbatim so query strings containing commas survive.

use super::{PlaylistParser, SubscriptionFormat};
use crate::models::ChannelRecord;

/// Delimited text parser
#[derive(Debug, Default, Clone, Copy)]
pub struct TxtParser;

impl TxtParser {
    /// Parse one line, `None` for blanks, comments and lines without both parts.
    pub fn parse_line(line: &str) -> Option<ChannelRecord> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (name, url) = line.split_once(',')?;
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() || url.is_empty() {
            return None;
        }

        Some(ChannelRecord::new(name, url))
    }
}

impl PlaylistParser for TxtParser {
    fn format(&self) -> SubscriptionFormat {
        SubscriptionFormat::Txt
    }

    fn parse(&self, content: &str) -> Vec<ChannelRecord> {
        content.lines().filter_map(Self::parse_line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LIVE_DURATION;

    #[test]
    fn test_url_keeps_commas() {
        let records = TxtParser.parse("CCTV1,http://example.com/a?x=1,2\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "CCTV1");
        assert_eq!(records[0].url, "http://example.com/a?x=1,2");
    }

    #[test]
    fn test_defaults() {
        let record = TxtParser::parse_line("  湖南卫视 , http://example.com/hunan  ").unwrap();
        assert_eq!(record.name, "湖南卫视");
        assert_eq!(record.url, "http://example.com/hunan");
        assert_eq!(record.duration, LIVE_DURATION);
        assert!(record.tvg_name.is_empty());
        assert!(record.tvg_logo.is_empty());
        assert!(record.group_title.is_empty());
        assert!(record.tvg_id.is_empty());
        assert!(record.raw_attributes.is_empty());
    }

    #[test]
    fn test_skips_malformed_lines() {
        let content = "\n# comment,http://x\nno comma here\n,http://noname\nname,\n央视频道,#genre#\nA,http://a\n";
        let records = TxtParser.parse(content);
        // A genre line still splits into two parts, it is not special here
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "#genre#");
        assert_eq!(records[1].name, "A");
    }
}
