//! Template-driven channel lookup
//!
//! Resolves a template channel name against the store in three tiers, stopping
//! at the first tier that yields anything:
//!
//! 1. exact, case-sensitive key
//! 2. case-insensitive key (first hit in store order)
//! 3. whitespace- and case-insensitive containment in either direction,
//!    collecting the sources of *every* matching key
//!
//! Tier 3 is additive on purpose: a template entry such as "CCTV1" pulls in
//! "CCTV1 HD" and "CCTV1 4K" alike, giving players several sources to fall
//! back between. Overlapping keys may therefore produce repeated URLs.

use serde::Serialize;

use crate::models::ChannelRecord;
use crate::services::ChannelStore;

/// Which tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    Fuzzy,
}

#[derive(Debug, Clone)]
pub struct ChannelMatch<'a> {
    pub tier: Option<MatchTier>,
    pub records: Vec<&'a ChannelRecord>,
}

impl ChannelMatch<'_> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct TemplateMatcher<'a> {
    store: &'a ChannelStore,
}

/// Lower-case and drop all whitespace
pub fn normalize_for_fuzzy(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl<'a> TemplateMatcher<'a> {
    pub fn new(store: &'a ChannelStore) -> Self {
        Self { store }
    }

    /// All source records for one template channel name, in tier order.
    pub fn find_channel_objects(&self, template_name: &str) -> Vec<&'a ChannelRecord> {
        self.find(template_name).records
    }

    pub fn find(&self, template_name: &str) -> ChannelMatch<'a> {
        if let Some(sources) = self.store.get(template_name)
            && !sources.is_empty()
        {
            return ChannelMatch {
                tier: Some(MatchTier::Exact),
                records: sources.iter().collect(),
            };
        }

        let lower = template_name.to_lowercase();
        if let Some((_, sources)) = self
            .store
            .iter()
            .find(|(name, sources)| !sources.is_empty() && name.to_lowercase() == lower)
        {
            return ChannelMatch {
                tier: Some(MatchTier::CaseInsensitive),
                records: sources.iter().collect(),
            };
        }

        let wanted = normalize_for_fuzzy(template_name);
        let records: Vec<&'a ChannelRecord> = self
            .store
            .iter()
            .filter(|(name, _)| {
                let key = normalize_for_fuzzy(name);
                key.contains(&wanted) || wanted.contains(&key)
            })
            .flat_map(|(_, sources)| sources.iter())
            .collect();

        ChannelMatch {
            tier: (!records.is_empty()).then_some(MatchTier::Fuzzy),
            records,
        }
    }
}
