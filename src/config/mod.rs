// src/config/mod.rs

//! Task graphs described in TOML.
//!
//! - [`model`]: the serde data model.
//! - [`loader`]: reading a file from disk.
//! - [`validate`]: dependency checks and registration order.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
