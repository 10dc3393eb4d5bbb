//! Configuration management for the refine print panel
//!
//! A single TOML file, layered with `REFINE_*` environment overrides and CLI flags.

pub mod settings;

pub use settings::Config;
