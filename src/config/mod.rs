//! Configuration module for Sumi-Discussions
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a missing file is equivalent to `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use sumi_discussions::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("discussions.toml")).unwrap();
//! println!("Pages will be staggered by {}ms", config.fetch.page_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_optional_config};
