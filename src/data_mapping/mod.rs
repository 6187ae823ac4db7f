//! Channel name canonicalization
//!
//! Subscriptions name the same channel in many ways ("CCTV-1", "cctv1 综合",
//! "CCTV 1 HD"). The alias table folds those spellings onto one canonical
//! name before channels are stored.

pub mod alias;

pub use alias::AliasTable;
