/// TOML configuration (`kestrel.toml`) with environment overrides.
pub mod config;
