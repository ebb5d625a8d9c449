// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::exec::MirrorMode;

/// Command-line arguments for `copypasta`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "copypasta",
    version,
    about = "Mirror a website with wget and show colorized, progress-aware output.",
    long_about = None
)]
pub struct CliArgs {
    /// Website to mirror.
    #[arg(value_name = "URL")]
    pub url: String,

    /// What to fetch: `page` also downloads page requisites (images, CSS),
    /// `mirror` only follows links.
    ///
    /// Overrides `[mirror].mode` from the config file.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<MirrorMode>,

    /// Optional config file (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Overall deadline for the mirroring process, e.g. `10m`, `30s`.
    ///
    /// Overrides `[mirror].timeout` from the config file.
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `COPYPASTA_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved command and settings, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse arguments from the process environment.
///
/// Unlike `CliArgs::parse()`, usage errors (missing URL, unknown flag) exit
/// with code 1. `--help` and `--version` still exit with 0.
pub fn parse() -> CliArgs {
    parse_from(std::env::args_os())
}

pub fn parse_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match CliArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_the_only_required_argument() {
        let args = CliArgs::try_parse_from(["copypasta", "https://example.com"]).unwrap();
        assert_eq!(args.url, "https://example.com");
        assert!(args.mode.is_none());
        assert!(args.config.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn missing_url_is_a_usage_error() {
        let err = CliArgs::try_parse_from(["copypasta"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn overrides_are_parsed() {
        let args = CliArgs::try_parse_from([
            "copypasta",
            "--mode",
            "mirror",
            "--timeout",
            "30s",
            "--log-level",
            "debug",
            "https://example.com",
        ])
        .unwrap();
        assert_eq!(args.mode, Some(MirrorMode::Mirror));
        assert_eq!(args.timeout.as_deref(), Some("30s"));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }
}
