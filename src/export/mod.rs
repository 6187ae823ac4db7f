//! Playlist exporters
//!
//! Renders the channel store as an extended M3U playlist (template-ordered
//! or sorted) and as a flat `name,url` list. Attribute values are written
//! into double-quoted fields as-is; nothing is escaped.

pub mod m3u;
pub mod txt;

pub use m3u::{M3uExporter, TemplateExport};
pub use txt::render_txt;

use crate::models::ChannelRecord;
use crate::services::ChannelStore;
use crate::utils::ChannelNameCollator;

/// Store channels sorted by canonical name in collation order
pub fn sorted_channels<'a>(
    store: &'a ChannelStore,
    collator: &ChannelNameCollator,
) -> Vec<(&'a str, &'a [ChannelRecord])> {
    let mut channels: Vec<(&str, &[ChannelRecord])> = store.iter().collect();
    collator.sort(&mut channels, |entry| entry.0);
    channels
}
