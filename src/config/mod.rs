// src/config/mod.rs

//! Configuration loading and validation for copypasta.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load an optional config file from disk (`loader.rs`).
//! - Validate it into typed settings (`validate.rs`).
//! - Apply command-line overrides on top.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    ColorsSection, ConfigFile, HighlightConfig, MirrorSection, MirrorSettings, ProgressSection,
    ProgressSettings, RawConfigFile,
};

use crate::cli::CliArgs;
use crate::errors::Result;

impl ConfigFile {
    /// Apply `--mode` and `--timeout`; CLI flags win over the file.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) -> Result<()> {
        if let Some(mode) = args.mode {
            self.mirror.mode = mode;
        }
        if let Some(ref timeout) = args.timeout {
            self.mirror.timeout = validate::non_zero_duration("--timeout", timeout)?;
        }
        Ok(())
    }
}
