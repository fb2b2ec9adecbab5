//! Configuration management.
//!
//! Configuration is read from a single TOML file. Missing files and missing
//! sections fall back to defaults; credentials are plain strings supplied by
//! the host.
//!
//! # Example
//!
//! ```no_run
//! use toolchat::config::ConfigurationLoader;
//! use std::path::Path;
//!
//! let loader = ConfigurationLoader::new(Some(Path::new("config/toolchat.toml"))).unwrap();
//! let config = &loader.config;
//!
//! println!("Provider: {}", config.provider.kind);
//! println!("Auto-invoke: {}", config.execution.auto_invoke_tools);
//! ```

#[allow(clippy::module_inception)]
pub mod config;

// Re-export main types for convenience
pub use self::config::{
    Configuration, ConfigurationLoader, ExecutionConfig, LoggingConfig, PluginsConfig,
    ProviderConfig, ProviderKind,
};
