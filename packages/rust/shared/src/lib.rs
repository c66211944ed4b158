//! Shared types, error model, and configuration for Tax Companion.
//!
//! This crate is the foundation depended on by all other Tax Companion crates.
//! It provides:
//! - [`TaxCompanionError`] — the unified error type
//! - Domain types ([`Step`], [`Profile`], [`ProfilePatch`], [`MessageLogEntry`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, TuiConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from, tui_log_path,
};
pub use error::{Result, TaxCompanionError};
pub use types::{
    Author, Choice, FieldName, FieldValue, MessageId, MessageLogEntry, Profile, ProfilePatch,
    SessionId, Step,
};
