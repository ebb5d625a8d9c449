// src/config/validate.rs

use std::time::Duration;

use colored::Color;

use crate::config::duration::parse_duration;
use crate::config::model::{
    ColorsSection, ConfigFile, HighlightConfig, MirrorSettings, ProgressSettings, RawConfigFile,
};
use crate::errors::{CopypastaError, Result};
use crate::render::{HighlightRule, Palette};

/// Longest accepted timeout or interval (30 days).
pub const MAX_DURATION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CopypastaError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let mirror = validate_mirror(&raw)?;
        let progress = validate_progress(&raw)?;
        let palette = validate_colors(&raw.colors)?;
        let highlights = validate_highlights(&raw.highlight)?;
        Ok(ConfigFile {
            mirror,
            progress,
            palette,
            highlights,
        })
    }
}

fn validate_mirror(cfg: &RawConfigFile) -> Result<MirrorSettings> {
    let program = cfg.mirror.program.trim();
    if program.is_empty() {
        return Err(CopypastaError::ConfigError(
            "[mirror].program must not be empty".to_string(),
        ));
    }

    Ok(MirrorSettings {
        program: program.to_string(),
        mode: cfg.mirror.mode,
        extra_args: cfg.mirror.extra_args.clone(),
        timeout: non_zero_duration("[mirror].timeout", &cfg.mirror.timeout)?,
    })
}

fn validate_progress(cfg: &RawConfigFile) -> Result<ProgressSettings> {
    if cfg.progress.total == 0 {
        return Err(CopypastaError::ConfigError(
            "[progress].total must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(ProgressSettings {
        total: cfg.progress.total,
        interval: non_zero_duration("[progress].interval", &cfg.progress.interval)?,
    })
}

fn validate_colors(colors: &ColorsSection) -> Result<Palette> {
    let defaults = Palette::default();
    let pick = |key: &str, value: &Option<String>, fallback: Color| match value {
        Some(name) => parse_color(key, name),
        None => Ok(fallback),
    };

    Ok(Palette {
        downloaded_label: pick(
            "[colors].downloaded_label",
            &colors.downloaded_label,
            defaults.downloaded_label,
        )?,
        saving_label: pick(
            "[colors].saving_label",
            &colors.saving_label,
            defaults.saving_label,
        )?,
        stdout: pick("[colors].stdout", &colors.stdout, defaults.stdout)?,
        stderr: pick("[colors].stderr", &colors.stderr, defaults.stderr)?,
        success: pick("[colors].success", &colors.success, defaults.success)?,
        failure: pick("[colors].failure", &colors.failure, defaults.failure)?,
    })
}

fn validate_highlights(rules: &[HighlightConfig]) -> Result<Vec<HighlightRule>> {
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let color = parse_color(&format!("[[highlight]] #{}", i + 1), &rule.color)?;
            HighlightRule::new(&rule.pattern, color).map_err(|e| {
                CopypastaError::ConfigError(format!(
                    "[[highlight]] #{} has invalid pattern '{}': {}",
                    i + 1,
                    rule.pattern,
                    e
                ))
            })
        })
        .collect()
}

/// Parse a color name as understood by `colored` (e.g. `"cyan"`,
/// `"bright blue"`).
pub fn parse_color(key: &str, name: &str) -> Result<Color> {
    name.trim().parse::<Color>().map_err(|_| {
        CopypastaError::ConfigError(format!("{key}: unknown color '{name}'"))
    })
}

/// Parse a duration that must be greater than zero.
pub fn non_zero_duration(key: &str, value: &str) -> Result<Duration> {
    let dur = parse_duration(value)
        .map_err(|e| CopypastaError::ConfigError(format!("{key}: {e}")))?;
    if dur.is_zero() {
        return Err(CopypastaError::ConfigError(format!(
            "{key} must be greater than zero"
        )));
    }
    if dur > MAX_DURATION {
        return Err(CopypastaError::ConfigError(format!(
            "{key} must be at most {}h",
            MAX_DURATION.as_secs() / 3600
        )));
    }
    Ok(dur)
}
