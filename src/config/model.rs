// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::exec::{DEFAULT_PROGRAM, MirrorMode, SupervisorOptions};
use crate::progress::{DEFAULT_RENDER_INTERVAL, DEFAULT_TOTAL};
use crate::render::{HighlightRule, Palette};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [mirror]
/// program = "wget"
/// mode = "page"
/// extra_args = ["--no-parent"]
/// timeout = "10m"
///
/// [progress]
/// total = 100
/// interval = "500ms"
///
/// [colors]
/// downloaded_label = "cyan"
///
/// [[highlight]]
/// pattern = "^Resolving"
/// color = "blue"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub mirror: MirrorSection,

    #[serde(default)]
    pub progress: ProgressSection,

    #[serde(default)]
    pub colors: ColorsSection,

    /// Plain-line highlight rules, applied in order.
    #[serde(default)]
    pub highlight: Vec<HighlightConfig>,
}

/// `[mirror]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorSection {
    /// Executable to run; looked up on `PATH` if not absolute.
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default)]
    pub mode: MirrorMode,

    /// Extra arguments, inserted between the mode flags and the URL.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Overall deadline, e.g. `"10m"`.
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_timeout() -> String {
    "10m".to_string()
}

impl Default for MirrorSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            mode: MirrorMode::default(),
            extra_args: Vec::new(),
            timeout: default_timeout(),
        }
    }
}

/// `[progress]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressSection {
    /// Nominal number of downloads that counts as 100%.
    #[serde(default = "default_total")]
    pub total: u64,

    /// Minimum delay between progress bar redraws.
    #[serde(default = "default_interval")]
    pub interval: String,
}

fn default_total() -> u64 {
    DEFAULT_TOTAL
}

fn default_interval() -> String {
    "500ms".to_string()
}

impl Default for ProgressSection {
    fn default() -> Self {
        Self {
            total: default_total(),
            interval: default_interval(),
        }
    }
}

/// `[colors]` section. Unset entries keep the default palette.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ColorsSection {
    #[serde(default)]
    pub downloaded_label: Option<String>,
    #[serde(default)]
    pub saving_label: Option<String>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub failure: Option<String>,
}

/// One `[[highlight]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    pub pattern: String,
    pub color: String,
}

/// Validated configuration.
///
/// Build it from a [`RawConfigFile`] with `ConfigFile::try_from`, or use
/// `ConfigFile::default()` when no file is given.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub mirror: MirrorSettings,
    pub progress: ProgressSettings,
    pub palette: Palette,
    pub highlights: Vec<HighlightRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSettings {
    pub program: String,
    pub mode: MirrorMode,
    pub extra_args: Vec<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSettings {
    pub total: u64,
    pub interval: Duration,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            mirror: MirrorSettings {
                program: default_program(),
                mode: MirrorMode::default(),
                extra_args: Vec::new(),
                timeout: crate::exec::supervisor::DEFAULT_DEADLINE,
            },
            progress: ProgressSettings {
                total: DEFAULT_TOTAL,
                interval: DEFAULT_RENDER_INTERVAL,
            },
            palette: Palette::default(),
            highlights: Vec::new(),
        }
    }
}

impl ConfigFile {
    pub fn supervisor_options(&self) -> SupervisorOptions {
        SupervisorOptions {
            deadline: self.mirror.timeout,
            progress_total: self.progress.total,
            progress_interval: self.progress.interval,
            ..SupervisorOptions::default()
        }
    }
}
