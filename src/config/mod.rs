//! Configuration module for Course-Mirror
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line values are layered on top by the binary
//! before [`Config::validate`] runs.
//!
//! # Example
//!
//! ```no_run
//! use course_mirror::config::load_config;
//! use std::path::Path;
//!
//! let mut config = load_config(Path::new("mirror.toml")).unwrap();
//! config.scope.start = "https://courses.example.edu/2024/".to_string();
//! config.validate().unwrap();
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HtmlConfig, OutputConfig, ScopeConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
