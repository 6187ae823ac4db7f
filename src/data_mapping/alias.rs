//! Alias table and name resolution
//!
//! Source lines look like `canonical,alias1,alias2,...`. Aliases are
//! compared lower-cased. Resolution tries an exact alias hit first, then the
//! first alias (in load order) that contains, or is contained by, the
//! lower-cased input. Load order therefore decides ties between fuzzy
//! matches, so entries live in a `Vec` rather than relying on map order.

use std::collections::HashMap;
use tracing::{debug, warn};

/// Ordered mapping from lower-cased alias to canonical channel name
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse alias list text. Malformed lines are skipped with a warning.
    pub fn parse(content: &str) -> Self {
        let mut table = Self::new();

        for (line_num, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            if parts.len() < 2 {
                warn!(line = line_num + 1, content = line, "Alias line has no aliases");
                continue;
            }

            let canonical = parts[0];
            if canonical.is_empty() {
                warn!(line = line_num + 1, content = line, "Alias line has an empty canonical name");
                continue;
            }

            for alias in &parts[1..] {
                if alias.is_empty() {
                    // An empty alias would fuzzy-match every name
                    warn!(line = line_num + 1, canonical, "Skipping empty alias");
                    continue;
                }
                table.insert(alias, canonical);
            }
        }

        debug!(alias_count = table.len(), "Alias table parsed");
        table
    }

    /// Register an alias. A repeated alias keeps its original position and
    /// takes the newest canonical name.
    pub fn insert(&mut self, alias: &str, canonical: &str) {
        let key = alias.to_lowercase();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = canonical.to_string(),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, canonical.to_string()));
            }
        }
    }

    /// Map a source channel name to its canonical name.
    ///
    /// Names without any alias hit resolve to themselves.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        let lower = name.to_lowercase();

        if let Some(&pos) = self.index.get(&lower) {
            return &self.entries[pos].1;
        }

        self.entries
            .iter()
            .find(|(alias, _)| lower.contains(alias.as_str()) || alias.contains(lower.as_str()))
            .map(|(_, canonical)| canonical.as_str())
            .unwrap_or(name)
    }

    /// Number of distinct aliases
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in load order as `(alias, canonical)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }
}
