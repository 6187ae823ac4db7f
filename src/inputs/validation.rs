//! Pre-flight validation of the input files
//!
//! Checks all five inputs without aggregating anything, so operators can
//! see every problem at once. Line numbers are 1-based and count blank
//! lines.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::SourcesConfig;
use crate::inputs::read_optional;
use crate::inputs::template::GENRE_MARKER;
use crate::utils::UrlUtils;

/// Outcome of checking one input file
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileValidation {
    pub path: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: BTreeMap<&'static str, usize>,
}

impl FileValidation {
    fn new(path: &Path, stat_keys: &[&'static str]) -> Self {
        Self {
            path: path.display().to_string(),
            stats: stat_keys.iter().map(|key| (*key, 0)).collect(),
            ..Default::default()
        }
    }

    fn bump(&mut self, key: &'static str) {
        *self.stats.entry(key).or_default() += 1;
    }

    fn stat(&self, key: &str) -> usize {
        self.stats.get(key).copied().unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub checked_at: DateTime<Utc>,
    pub has_errors: bool,
    /// Every file's errors, prefixed with the file path
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub files: BTreeMap<&'static str, FileValidation>,
}

impl ValidationSummary {
    fn from_files(files: BTreeMap<&'static str, FileValidation>) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for file in files.values() {
            errors.extend(file.errors.iter().map(|e| format!("{}: {}", file.path, e)));
            warnings.extend(file.warnings.iter().map(|w| format!("{}: {}", file.path, w)));
        }

        Self {
            checked_at: Utc::now(),
            has_errors: !errors.is_empty(),
            errors,
            warnings,
            files,
        }
    }
}

/// Run every file check
pub fn validate_source_configs(sources: &SourcesConfig) -> ValidationSummary {
    let mut files = BTreeMap::new();
    files.insert("subscribe", validate_subscribe(&sources.subscribe));
    files.insert("alias", validate_alias(&sources.alias));
    files.insert("template", validate_template(&sources.template));
    files.insert("epg", validate_epg(&sources.epg));
    files.insert("logo", validate_logo(&sources.logo));
    ValidationSummary::from_files(files)
}

/// Read the file for checking. `Ok(None)` means it does not exist; any
/// other read failure is recorded as an error.
fn read_for_check(path: &Path, result: &mut FileValidation) -> Option<Option<String>> {
    match read_optional(path) {
        Ok(content) => Some(content),
        Err(e) => {
            result.errors.push(format!("cannot read file: {e}"));
            None
        }
    }
}

/// Non-blank, non-comment lines with their 1-based line numbers
fn entry_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(index, raw)| (index + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

pub fn validate_subscribe(path: &Path) -> FileValidation {
    let mut result = FileValidation::new(path, &["total", "valid"]);
    let content = match read_for_check(path, &mut result) {
        Some(Some(content)) => content,
        Some(None) => {
            result.errors.push("subscription list does not exist".to_string());
            return result;
        }
        None => return result,
    };

    for (line_num, line) in entry_lines(&content) {
        result.bump("total");

        if !UrlUtils::has_scheme(line) {
            result.errors.push(format!("line {line_num} is missing a protocol prefix: {line}"));
            continue;
        }

        if UrlUtils::parse_lenient(line).is_err() {
            result.warnings.push(format!("line {line_num} is not a standard URL: {line}"));
        }
        result.bump("valid");
    }

    if result.stat("total") == 0 {
        result.warnings.push("no subscription URLs found".to_string());
    }

    result
}

pub fn validate_alias(path: &Path) -> FileValidation {
    let mut result = FileValidation::new(path, &["total", "valid"]);
    let content = match read_for_check(path, &mut result) {
        Some(Some(content)) => content,
        Some(None) => {
            result.warnings.push("alias list does not exist, skipping".to_string());
            return result;
        }
        None => return result,
    };

    for (line_num, line) in entry_lines(&content) {
        result.bump("total");

        let parts = line.split(',').map(str::trim).filter(|p| !p.is_empty()).count();
        if parts < 2 {
            result.errors.push(format!("line {line_num} needs at least one alias: {line}"));
            continue;
        }
        result.bump("valid");
    }

    result
}

pub fn validate_template(path: &Path) -> FileValidation {
    let mut result = FileValidation::new(path, &["categories", "channels"]);
    let content = match read_for_check(path, &mut result) {
        Some(Some(content)) => content,
        Some(None) => {
            result
                .warnings
                .push("template does not exist, default ordering will be used".to_string());
            return result;
        }
        None => return result,
    };

    let mut in_category = false;
    for (index, raw) in content.lines().enumerate() {
        let line_num = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            result
                .warnings
                .push(format!("line {line_num} starts with # and is ignored"));
            continue;
        }

        if line.contains(GENRE_MARKER) {
            in_category = !line.replacen(GENRE_MARKER, "", 1).trim().is_empty();
            if in_category {
                result.bump("categories");
            } else {
                result.errors.push(format!("line {line_num} has an empty category title"));
            }
            continue;
        }

        if !in_category {
            result.errors.push(format!("line {line_num} channel has no category: {line}"));
            continue;
        }
        result.bump("channels");
    }

    if result.stat("categories") == 0 {
        result
            .warnings
            .push("no categories defined, the template will have no effect".to_string());
    }

    result
}

pub fn validate_epg(path: &Path) -> FileValidation {
    let mut result = FileValidation::new(path, &["total"]);
    let content = match read_for_check(path, &mut result) {
        Some(Some(content)) => content,
        Some(None) => {
            result
                .warnings
                .push("EPG list does not exist, players will have no programme guide".to_string());
            return result;
        }
        None => return result,
    };

    for (line_num, line) in entry_lines(&content) {
        result.bump("total");
        if !UrlUtils::has_scheme(line) {
            result.errors.push(format!("line {line_num} is not a valid URL: {line}"));
        }
    }

    result
}

pub fn validate_logo(path: &Path) -> FileValidation {
    let mut result = FileValidation::new(path, &["total", "valid"]);
    let content = match read_for_check(path, &mut result) {
        Some(Some(content)) => content,
        Some(None) => {
            result
                .warnings
                .push("logo list does not exist, no custom logos".to_string());
            return result;
        }
        None => return result,
    };

    for (line_num, line) in entry_lines(&content) {
        result.bump("total");
        if !line.contains(',') {
            result.errors.push(format!("line {line_num} is missing a logo URL: {line}"));
            continue;
        }
        result.bump("valid");
    }

    result
}
