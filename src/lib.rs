// src/lib.rs

pub mod classify;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod progress;
pub mod render;

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default};
use crate::errors::{CopypastaError, Result};
use crate::exec::{MirrorCommand, RunReport, Supervisor, SupervisorOptions};
use crate::render::{ConsoleSink, OutputSink, Renderer};

/// Schemes the mirroring tool can fetch.
const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - URL parsing
/// - config loading + CLI overrides
/// - the supervisor, rendering to the console
///
/// Returns `None` for `--dry-run`.
pub async fn run(args: CliArgs) -> Result<Option<RunReport>> {
    let url = parse_target(&args.url)?;

    let mut cfg = load_or_default(args.config.as_deref())?;
    cfg.apply_cli_overrides(&args)?;

    let command = MirrorCommand::for_url(
        &cfg.mirror.program,
        cfg.mirror.mode,
        &cfg.mirror.extra_args,
        &url,
    );

    if args.dry_run {
        print_dry_run(&command, &cfg);
        return Ok(None);
    }

    let renderer = Arc::new(Renderer::new(cfg.palette, cfg.highlights.clone()));
    let sink: Arc<dyn OutputSink> = Arc::new(ConsoleSink::new());

    info!(url = %url, mode = ?cfg.mirror.mode, "mirroring");
    run_mirror(command, cfg.supervisor_options(), renderer, sink)
        .await
        .map(Some)
}

/// Run one mirroring command to completion, rendering into `sink`.
pub async fn run_mirror(
    command: MirrorCommand,
    options: SupervisorOptions,
    renderer: Arc<Renderer>,
    sink: Arc<dyn OutputSink>,
) -> Result<RunReport> {
    let mut supervisor = Supervisor::new(command, options, renderer, sink);
    supervisor.run().await
}

/// Parse the user-supplied target into the normalized URL passed to the
/// mirroring tool.
///
/// A bare host like `example.com` or `localhost:8080/docs` is treated as
/// `http://...`.
pub fn parse_target(input: &str) -> Result<Url> {
    let input = input.trim();
    let url = match Url::parse(input) {
        Ok(url) if looks_like_host_port(input, &url) => assume_http(input)?,
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => assume_http(input)?,
        Err(e) => return Err(e.into()),
    };

    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(CopypastaError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(CopypastaError::InvalidUrl(url::ParseError::EmptyHost));
    }
    Ok(url)
}

/// `host:port[/path]` parses with the host as the scheme. A real scheme is
/// never followed by a digit, so `mailto:` and friends are left alone.
fn looks_like_host_port(input: &str, url: &Url) -> bool {
    if SUPPORTED_SCHEMES.contains(&url.scheme()) || input.contains("://") {
        return false;
    }
    input
        .split_once(':')
        .is_some_and(|(_, rest)| rest.starts_with(|c: char| c.is_ascii_digit()))
}

fn assume_http(input: &str) -> Result<Url> {
    debug!(input, "no scheme given; assuming http");
    Ok(Url::parse(&format!("http://{input}"))?)
}

/// Simple dry-run output: print the command and effective settings.
fn print_dry_run(command: &MirrorCommand, cfg: &ConfigFile) {
    println!("copypasta dry-run");
    println!("  command: {command}");
    println!("  mode = {:?}", cfg.mirror.mode);
    println!("  timeout = {:?}", cfg.mirror.timeout);
    println!("  progress.total = {}", cfg.progress.total);
    println!("  progress.interval = {:?}", cfg.progress.interval);
    if !cfg.highlights.is_empty() {
        println!();
        println!("highlight rules ({}):", cfg.highlights.len());
        for rule in &cfg.highlights {
            println!("  - {} -> {:?}", rule.pattern(), rule.color());
        }
    }

    debug!("dry-run complete (no execution)");
}
