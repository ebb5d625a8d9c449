#![allow(dead_code)]

use std::time::Duration;

use copypasta::config::{ConfigFile, HighlightConfig, RawConfigFile};
use copypasta::exec::{MirrorCommand, MirrorMode, SupervisorOptions};

/// Builder for `ConfigFile` that goes through the same validation as a
/// config file on disk.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn program(mut self, program: &str) -> Self {
        self.config.mirror.program = program.to_string();
        self
    }

    pub fn mode(mut self, mode: MirrorMode) -> Self {
        self.config.mirror.mode = mode;
        self
    }

    pub fn extra_arg(mut self, arg: &str) -> Self {
        self.config.mirror.extra_args.push(arg.to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.config.mirror.timeout = timeout.to_string();
        self
    }

    pub fn progress(mut self, total: u64, interval: &str) -> Self {
        self.config.progress.total = total;
        self.config.progress.interval = interval.to_string();
        self
    }

    pub fn highlight(mut self, pattern: &str, color: &str) -> Self {
        self.config.highlight.push(HighlightConfig {
            pattern: pattern.to_string(),
            color: color.to_string(),
        });
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A command that runs `script` with `sh -c`.
pub fn sh(script: &str) -> MirrorCommand {
    MirrorCommand::new("sh", vec!["-c".to_string(), script.to_string()])
}

/// Supervisor options with a short deadline and drain grace, suitable for
/// tests that spawn real processes.
pub fn quick_options(deadline: Duration) -> SupervisorOptions {
    SupervisorOptions {
        deadline,
        drain_grace: Duration::from_millis(500),
        ..SupervisorOptions::default()
    }
}
