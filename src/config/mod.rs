// src/config/mod.rs

//! TOML configuration for the `cmdexec` binary.
//!
//! - [`model`] holds the raw serde structs and the validated [`ConfigFile`].
//! - [`validate`] implements `TryFrom<RawConfigFile> for ConfigFile`.
//! - [`loader`] reads a file from disk.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, ExecSection, OutputSection, RawConfigFile};
