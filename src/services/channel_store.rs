//! Multi-source channel store
//!
//! Maps canonical channel names to every distinct stream contributed for
//! them. Names are canonicalized through the alias table on insertion, and
//! a stream URL is stored at most once per channel.
//!
//! Channel keys keep their first-insertion order. Nothing downstream relies
//! on that order for correctness, but it makes the case-insensitive and
//! fuzzy lookups reproducible for a given insertion sequence.

use std::collections::HashMap;

use crate::data_mapping::AliasTable;
use crate::models::ChannelRecord;

/// What happened to a record passed to [`ChannelStore::add_channel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Same URL already stored under the canonical name
    Duplicate,
    /// Missing name or URL
    Rejected,
}

#[derive(Debug, Default)]
pub struct ChannelStore {
    aliases: AliasTable,
    channels: Vec<(String, Vec<ChannelRecord>)>,
    index: HashMap<String, usize>,
}

impl ChannelStore {
    pub fn new(aliases: AliasTable) -> Self {
        Self {
            aliases,
            channels: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert one record under its canonical name unless its URL is already
    /// stored for that channel.
    pub fn add_channel(&mut self, record: ChannelRecord) -> InsertOutcome {
        if !record.is_complete() {
            return InsertOutcome::Rejected;
        }

        let canonical = self.aliases.resolve(&record.name).to_string();
        let pos = match self.index.get(&canonical) {
            Some(&pos) => pos,
            None => {
                self.index.insert(canonical.clone(), self.channels.len());
                self.channels.push((canonical.clone(), Vec::new()));
                self.channels.len() - 1
            }
        };

        let sources = &mut self.channels[pos].1;
        if sources.iter().any(|existing| existing.url == record.url) {
            return InsertOutcome::Duplicate;
        }

        sources.push(ChannelRecord {
            name: canonical,
            ..record
        });
        InsertOutcome::Inserted
    }

    /// Insert a batch, returning how many records were stored.
    pub fn extend<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ChannelRecord>,
    {
        records
            .into_iter()
            .map(|record| self.add_channel(record))
            .filter(|outcome| *outcome == InsertOutcome::Inserted)
            .count()
    }

    /// Sources for an exact (case-sensitive) canonical name
    pub fn get(&self, name: &str) -> Option<&[ChannelRecord]> {
        self.index
            .get(name)
            .map(|&pos| self.channels[pos].1.as_slice())
    }

    /// Channels in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ChannelRecord])> {
        self.channels
            .iter()
            .map(|(name, sources)| (name.as_str(), sources.as_slice()))
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Total number of stored streams across all channels
    pub fn stream_count(&self) -> usize {
        self.channels.iter().map(|(_, sources)| sources.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
