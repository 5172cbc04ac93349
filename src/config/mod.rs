#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;
