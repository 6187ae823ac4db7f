//! Line-oriented input files
//!
//! Every input is optional except the subscription list. A missing file
//! disables its feature for the run; any other I/O failure is an error.

pub mod template;
pub mod validation;

use std::io::ErrorKind;
use std::path::Path;
use tracing::{error, info, warn};

use crate::data_mapping::AliasTable;
use crate::errors::AppResult;
use crate::logo_assets::LogoTable;
use crate::models::Template;

pub use template::parse_template;
pub use validation::{FileValidation, ValidationSummary, validate_source_configs};

/// Read a file, mapping "not found" to `None`
pub fn read_optional(path: &Path) -> AppResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Trimmed, non-blank, non-comment lines
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Subscription URLs, `None` when the list does not exist
pub fn load_subscriptions(path: &Path) -> AppResult<Option<Vec<String>>> {
    match read_optional(path)? {
        Some(content) => {
            let urls = parse_url_list(&content);
            info!("Loaded {} subscription URLs from {}", urls.len(), path.display());
            Ok(Some(urls))
        }
        None => {
            error!("Subscription list not found: {}", path.display());
            Ok(None)
        }
    }
}

/// EPG guide URLs, empty when the file does not exist
pub fn load_epg(path: &Path) -> AppResult<Vec<String>> {
    match read_optional(path)? {
        Some(content) => {
            let urls = parse_url_list(&content);
            info!("Loaded {} EPG URLs", urls.len());
            Ok(urls)
        }
        None => {
            info!("EPG list not found, playlist header will not carry x-tvg-url: {}", path.display());
            Ok(Vec::new())
        }
    }
}

pub fn load_aliases(path: &Path) -> AppResult<AliasTable> {
    match read_optional(path)? {
        Some(content) => {
            let table = AliasTable::parse(&content);
            info!("Loaded {} channel aliases", table.len());
            Ok(table)
        }
        None => {
            info!("Alias list not found, channel names are used as-is: {}", path.display());
            Ok(AliasTable::new())
        }
    }
}

pub fn load_logos(path: &Path) -> AppResult<LogoTable> {
    match read_optional(path)? {
        Some(content) => {
            let table = LogoTable::parse(&content);
            info!("Loaded {} channel logos", table.len());
            Ok(table)
        }
        None => {
            info!("Logo list not found, no logo fallbacks: {}", path.display());
            Ok(LogoTable::new())
        }
    }
}

/// Export template, `None` when the file does not exist
pub fn load_template(path: &Path) -> AppResult<Option<Template>> {
    match read_optional(path)? {
        Some(content) => {
            let template = parse_template(&content);
            info!(
                "Loaded template with {} categories and {} channels",
                template.categories.len(),
                template.channel_count()
            );
            Ok(Some(template))
        }
        None => {
            warn!("Template not found, using default export order: {}", path.display());
            Ok(None)
        }
    }
}
