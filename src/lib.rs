//! IPTV subscription aggregator
//!
//! Fetches channel listings from many subscriptions, canonicalizes channel
//! names through an alias table, merges the streams per channel and renders
//! template-ordered M3U and flat TXT playlists.

pub mod config;
pub mod data_mapping;
pub mod errors;
pub mod export;
pub mod ingestor;
pub mod inputs;
pub mod logo_assets;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;
pub mod web;
