/// Configuration default values
///
/// All defaults live here so they can be changed in one place.
// Input files
pub const DEFAULT_SUBSCRIBE_PATH: &str = "source/subscribe.txt";
pub const DEFAULT_ALIAS_PATH: &str = "source/alias.txt";
pub const DEFAULT_LOGO_PATH: &str = "source/logo.txt";
pub const DEFAULT_TEMPLATE_PATH: &str = "source/template.txt";
pub const DEFAULT_EPG_PATH: &str = "source/epg.txt";

// Output files
pub const DEFAULT_M3U_OUTPUT_PATH: &str = "output/output.m3u";
pub const DEFAULT_TXT_OUTPUT_PATH: &str = "output/output.txt";

// Subscription fetching
pub const DEFAULT_FETCH_TIMEOUT: &str = "10s";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

// Web server
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ADMIN_TOKEN: &str = "default_admin_token";
pub const DEFAULT_UPDATE_ON_START: bool = true;

// Validation
pub const DEFAULT_STRICT_VALIDATION: bool = false;

// Environment
pub const ENV_PREFIX: &str = "IPTV_AGGREGATOR_";
