//! Configuration module for Reel Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key has a built-in default matching the stock Douban Top 250
//! run, so a config file is optional.
//!
//! # Example
//!
//! ```no_run
//! use reel_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Fetching offsets: {:?}", config.page_offsets());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, RequestConfig, StorageConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
