//! Extended M3U playlist parser
//!
//! Handles `#EXTINF:<duration> key="value" ...,<display name>` headers
//! followed by a stream URL line. Only `tvg-name`, `tvg-logo`,
//! `group-title` and `tvg-id` are lifted into named fields; the whole
//! attribute text is kept in `raw_attributes`.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::{PlaylistParser, SubscriptionFormat};
use crate::models::ChannelRecord;

// Greedy attribute group: the display name is whatever follows the last comma.
static EXTINF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#EXTINF:(-?\d+)(.*),(.+)$").expect("EXTINF pattern is valid")
});

static TVG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"tvg-name="([^"]*)""#).expect("tvg-name pattern is valid"));
static TVG_LOGO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"tvg-logo="([^"]*)""#).expect("tvg-logo pattern is valid"));
static GROUP_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"group-title="([^"]*)""#).expect("group-title pattern is valid")
});
static TVG_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"tvg-id="([^"]*)""#).expect("tvg-id pattern is valid"));

/// M3U playlist parser
#[derive(Debug, Default, Clone, Copy)]
pub struct M3uParser;

impl M3uParser {
    /// Parse one `#EXTINF:` line into a pending record (URL still empty).
    ///
    /// Returns `None` when the line does not have a duration and a non-empty
    /// display name after the last comma.
    pub fn parse_extinf_line(line: &str) -> Option<ChannelRecord> {
        let captures = EXTINF_RE.captures(line)?;

        let duration = captures[1].parse::<i64>().ok()?;
        let attributes = captures[2].trim();
        let name = captures[3].trim();
        if name.is_empty() {
            return None;
        }

        let mut record = ChannelRecord::new(name, String::new());
        record.duration = duration;
        record.tvg_name = extract_attribute(&TVG_NAME_RE, attributes);
        record.tvg_logo = extract_attribute(&TVG_LOGO_RE, attributes);
        record.group_title = extract_attribute(&GROUP_TITLE_RE, attributes);
        record.tvg_id = extract_attribute(&TVG_ID_RE, attributes);
        record.raw_attributes = attributes.to_string();
        Some(record)
    }
}

fn extract_attribute(pattern: &Regex, attributes: &str) -> String {
    pattern
        .captures(attributes)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

impl PlaylistParser for M3uParser {
    fn format(&self) -> SubscriptionFormat {
        SubscriptionFormat::M3u
    }

    fn parse(&self, content: &str) -> Vec<ChannelRecord> {
        let mut channels = Vec::new();
        let mut pending: Option<ChannelRecord> = None;
        let mut dropped = 0usize;

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.starts_with("#EXTINF:") {
                match Self::parse_extinf_line(line) {
                    Some(record) => {
                        if pending.replace(record).is_some() {
                            dropped += 1;
                        }
                    }
                    None => {
                        warn!(line = line_num + 1, "Ignoring malformed EXTINF header");
                    }
                }
            } else if !line.is_empty() && !line.starts_with('#') {
                if let Some(mut record) = pending.take() {
                    record.url = line.to_string();
                    channels.push(record);
                }
            }
        }

        if pending.is_some() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "Dropped EXTINF headers without a stream URL");
        }

        channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_full_attributes() {
        let content = r#"#EXTM3U x-tvg-url="http://epg.example.com/e.xml"
#EXTINF:-1 tvg-id="cctv1" tvg-name="CCTV-1" tvg-logo="http://logo/cctv1.png" group-title="央视",CCTV-1 综合
http://example.com/cctv1.m3u8
#EXTINF:0 group-title="卫视",湖南卫视
http://example.com/hunan.m3u8
"#;
        let records = M3uParser.parse(content);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.name, "CCTV-1 综合");
        assert_eq!(first.url, "http://example.com/cctv1.m3u8");
        assert_eq!(first.duration, -1);
        assert_eq!(first.tvg_id, "cctv1");
        assert_eq!(first.tvg_name, "CCTV-1");
        assert_eq!(first.tvg_logo, "http://logo/cctv1.png");
        assert_eq!(first.group_title, "央视");
        assert!(first.raw_attributes.contains("tvg-id=\"cctv1\""));

        let second = &records[1];
        assert_eq!(second.name, "湖南卫视");
        assert_eq!(second.duration, 0);
        assert_eq!(second.tvg_name, "");
        assert_eq!(second.tvg_logo, "");
    }

    #[test]
    fn test_display_name_follows_last_comma() {
        let record =
            M3uParser::parse_extinf_line(r#"#EXTINF:-1 tvg-name="A,B" group-title="x",Final Name"#)
                .unwrap();
        assert_eq!(record.name, "Final Name");
        assert_eq!(record.tvg_name, "A,B");
    }

    #[rstest]
    #[case("#EXTINF:-1,Plain", Some(("Plain", -1)))]
    #[case("#EXTINF:10,Ten", Some(("Ten", 10)))]
    #[case("#EXTINF:-1 tvg-id=\"x\",", None)]
    #[case("#EXTINF:abc,Name", None)]
    #[case("#EXTINF:-1 no comma", None)]
    fn test_extinf_header_shapes(#[case] line: &str, #[case] expected: Option<(&str, i64)>) {
        let parsed = M3uParser::parse_extinf_line(line).map(|r| (r.name, r.duration));
        assert_eq!(
            parsed,
            expected.map(|(name, duration)| (name.to_string(), duration))
        );
    }

    #[test]
    fn test_header_without_url_is_dropped() {
        let content = "#EXTM3U\n#EXTINF:-1,Lost\n#EXTINF:-1,Kept\nhttp://example.com/kept\n#EXTINF:-1,Trailing\n";
        let records = M3uParser.parse(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Kept");
    }

    #[test]
    fn test_comment_lines_between_header_and_url() {
        let content = "#EXTINF:-1,A\n#EXTVLCOPT:http-user-agent=x\n\nhttp://example.com/a\n";
        let records = M3uParser.parse(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "http://example.com/a");
    }

    #[test]
    fn test_stray_urls_are_ignored() {
        let content = "#EXTM3U\nhttp://example.com/orphan\n#EXTINF:-1,A\nhttp://example.com/a\nhttp://example.com/extra\n";
        let records = M3uParser.parse(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "http://example.com/a");
    }

    #[test]
    fn test_well_formed_pairs_preserve_order() {
        let mut content = String::from("#EXTM3U\r\n");
        for i in 0..25 {
            content.push_str(&format!("#EXTINF:-1 tvg-id=\"c{i}\",Channel {i}\r\nhttp://example.com/{i}\r\n"));
        }
        let records = M3uParser.parse(&content);
        assert_eq!(records.len(), 25);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.name, format!("Channel {i}"));
            assert_eq!(record.url, format!("http://example.com/{i}"));
        }
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(M3uParser.parse("").is_empty());
        assert!(M3uParser.parse("#EXTM3U\n<html>oops</html>\n").is_empty());
    }
}
