//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/docflow/config.toml)
//! 3. Project config (.docflow/config.toml)
//! 4. Environment variables (DOCFLOW_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
