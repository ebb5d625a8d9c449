// src/exec/command.rs

//! Building the mirroring-tool invocation.

use std::fmt;
use std::process::Stdio;

use clap::ValueEnum;
use serde::Deserialize;
use tokio::process::Command;
use url::Url;

pub const DEFAULT_PROGRAM: &str = "wget";

/// Which flag set to pass to the mirroring tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MirrorMode {
    /// Mirror and fetch page requisites (images, stylesheets, scripts).
    #[default]
    Page,
    /// Mirror only; skip page requisites.
    Mirror,
}

impl MirrorMode {
    pub fn flags(self) -> &'static [&'static str] {
        match self {
            MirrorMode::Page => &[
                "--mirror",
                "--convert-links",
                "--adjust-extension",
                "--page-requisites",
            ],
            MirrorMode::Mirror => &["--mirror", "--convert-links", "--adjust-extension"],
        }
    }
}

/// A program plus its arguments. No shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl MirrorCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `<program> <mode flags> <extra_args> <url>`.
    pub fn for_url(program: &str, mode: MirrorMode, extra_args: &[String], url: &Url) -> Self {
        let args = mode
            .flags()
            .iter()
            .map(|s| s.to_string())
            .chain(extra_args.iter().cloned())
            .chain(std::iter::once(url.as_str().to_string()))
            .collect();
        Self::new(program, args)
    }

    /// A `tokio` command with both output streams piped and no stdin.
    ///
    /// The child is killed if its handle is dropped.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl fmt::Display for MirrorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
