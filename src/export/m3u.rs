//! Extended M3U rendering
//!
//! Output layout:
//!
//! ```text
//! #EXTM3U
//! #EXTM3U x-tvg-url="<epg1>,<epg2>"        (only with EPG URLs)
//!
//! <category>,#genre#                        (template export only)
//! #EXTINF:<duration> tvg-name="..." tvg-logo="..." group-title="..." tvg-id="...",<name>
//! <url>
//! ```
//!
//! Empty attributes are omitted from the `#EXTINF` line.

use tracing::debug;

use super::sorted_channels;
use crate::logo_assets::LogoTable;
use crate::models::{ChannelRecord, Template};
use crate::services::{ChannelStore, TemplateMatcher};
use crate::utils::ChannelNameCollator;

/// Rendered template playlist plus the number of streams it contains
#[derive(Debug, Clone)]
pub struct TemplateExport {
    pub content: String,
    pub matched_streams: usize,
}

pub struct M3uExporter<'a> {
    store: &'a ChannelStore,
    logos: &'a LogoTable,
    epg_urls: &'a [String],
}

struct EntryAttributes<'r> {
    tvg_name: &'r str,
    tvg_logo: &'r str,
    group_title: &'r str,
    tvg_id: &'r str,
}

impl<'a> M3uExporter<'a> {
    pub fn new(store: &'a ChannelStore, logos: &'a LogoTable, epg_urls: &'a [String]) -> Self {
        Self {
            store,
            logos,
            epg_urls,
        }
    }

    fn header(&self) -> String {
        let mut content = String::from("#EXTM3U\n");
        if !self.epg_urls.is_empty() {
            content.push_str(&format!(
                "#EXTM3U x-tvg-url=\"{}\"\n",
                self.epg_urls.join(",")
            ));
        }
        content
    }

    fn push_entry(
        content: &mut String,
        record: &ChannelRecord,
        attrs: &EntryAttributes<'_>,
        display_name: &str,
    ) {
        let mut extinf = format!("#EXTINF:{}", record.duration);
        for (key, value) in [
            ("tvg-name", attrs.tvg_name),
            ("tvg-logo", attrs.tvg_logo),
            ("group-title", attrs.group_title),
            ("tvg-id", attrs.tvg_id),
        ] {
            if !value.is_empty() {
                extinf.push_str(&format!(" {key}=\"{value}\""));
            }
        }
        content.push_str(&format!("{extinf},{display_name}\n{}\n", record.url));
    }

    /// Template-ordered playlist.
    ///
    /// Only channels reached through the template are emitted. Each emitted
    /// stream takes the category title as its group, the template name as its
    /// display name, and falls back to the template name for `tvg-name` and
    /// to the logo table for `tvg-logo`.
    pub fn render_with_template(&self, template: &Template) -> TemplateExport {
        let matcher = TemplateMatcher::new(self.store);
        let mut content = self.header();
        let mut matched_streams = 0usize;

        for category in &template.categories {
            content.push_str(&format!("\n{},#genre#\n", category.title));

            for channel_name in &category.channels {
                let found = matcher.find(channel_name);
                if found.is_empty() {
                    debug!(channel = %channel_name, "Template channel has no sources");
                    continue;
                }

                for record in found.records {
                    let tvg_name = if record.tvg_name.is_empty() {
                        channel_name.as_str()
                    } else {
                        record.tvg_name.as_str()
                    };
                    let tvg_logo = if record.tvg_logo.is_empty() {
                        self.logos.get(channel_name).unwrap_or_default()
                    } else {
                        record.tvg_logo.as_str()
                    };
                    let attrs = EntryAttributes {
                        tvg_name,
                        tvg_logo,
                        group_title: &category.title,
                        tvg_id: &record.tvg_id,
                    };
                    Self::push_entry(&mut content, record, &attrs, channel_name);
                    matched_streams += 1;
                }
            }
        }

        TemplateExport {
            content,
            matched_streams,
        }
    }

    /// Every stored channel in collation order, groups as stored.
    pub fn render_default(&self, collator: &ChannelNameCollator) -> String {
        let mut content = self.header();

        for (name, sources) in sorted_channels(self.store, collator) {
            for record in sources {
                let tvg_name = if record.tvg_name.is_empty() {
                    name
                } else {
                    record.tvg_name.as_str()
                };
                let tvg_logo = if record.tvg_logo.is_empty() {
                    self.logos.get(name).unwrap_or_default()
                } else {
                    record.tvg_logo.as_str()
                };
                let attrs = EntryAttributes {
                    tvg_name,
                    tvg_logo,
                    group_title: &record.group_title,
                    tvg_id: &record.tvg_id,
                };
                Self::push_entry(&mut content, record, &attrs, name);
            }
        }

        content
    }
}
