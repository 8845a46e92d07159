//! Configuration management for portprobe.
//!
//! Provides the settings file that seeds command-line defaults.

mod settings;

pub use settings::{default_settings_path, ProbeSettings};
