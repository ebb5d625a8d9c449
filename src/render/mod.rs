// src/render/mod.rs

//! Turning classified lines into styled terminal output.
//!
//! Rendering is split in two:
//! - [`Renderer`] is pure: it maps a [`ClassifiedLine`] (or a run outcome) to
//!   a [`StyledLine`], a list of text fragments each tagged with an optional
//!   color. There is no global color state.
//! - [`OutputSink`] implementations decide what to do with styled lines.
//!   [`ConsoleSink`] paints them with `colored` and writes to stdout;
//!   [`MemorySink`] records them for tests.

pub mod highlight;
pub mod memory;
pub mod sink;

use colored::{Color, Colorize};

use crate::classify::{ClassifiedLine, LineKind, StreamSource};
use crate::exec::RunOutcome;

pub use highlight::HighlightRule;
pub use memory::{MemorySink, SinkEvent};
pub use sink::{ConsoleSink, OutputSink};

pub const DOWNLOADED_LABEL: &str = "Downloaded: ";
pub const SAVING_TO_LABEL: &str = "Saving to: ";
pub const SUCCESS_MESSAGE: &str = "Download completed successfully!";
pub const FAILURE_PREFIX: &str = "Command finished with error: ";
pub const BANNER_PREFIX: &str = "Running command: ";

/// A run of text rendered in a single color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub color: Option<Color>,
}

impl Fragment {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

/// One output line made of colored fragments. Never contains the newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub fragments: Vec<Fragment>,
}

impl StyledLine {
    pub fn single(text: impl Into<String>, color: Color) -> Self {
        Self {
            fragments: vec![Fragment::new(text, color)],
        }
    }

    pub fn labeled(label: &str, label_color: Color, value: &str, value_color: Color) -> Self {
        Self {
            fragments: vec![
                Fragment::new(label, label_color),
                Fragment::new(value, value_color),
            ],
        }
    }

    /// The text without any styling.
    pub fn plain_text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// The text with ANSI color codes, subject to `colored`'s global
    /// `NO_COLOR` / `CLICOLOR` handling.
    pub fn paint(&self) -> String {
        self.fragments
            .iter()
            .map(|f| match f.color {
                Some(c) => f.text.as_str().color(c).to_string(),
                None => f.text.clone(),
            })
            .collect()
    }
}

/// Colors used by the [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub downloaded_label: Color,
    pub saving_label: Color,
    pub stdout: Color,
    pub stderr: Color,
    pub success: Color,
    pub failure: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            downloaded_label: Color::Cyan,
            saving_label: Color::Magenta,
            stdout: Color::Green,
            stderr: Color::Yellow,
            success: Color::Green,
            failure: Color::Red,
        }
    }
}

impl Palette {
    pub fn stream_color(&self, source: StreamSource) -> Color {
        match source {
            StreamSource::Stdout => self.stdout,
            StreamSource::Stderr => self.stderr,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    palette: Palette,
    highlights: Vec<HighlightRule>,
}

impl Renderer {
    pub fn new(palette: Palette, highlights: Vec<HighlightRule>) -> Self {
        Self {
            palette,
            highlights,
        }
    }

    /// Render one classified line.
    ///
    /// Labels get their own color; payloads and plain lines use the color of
    /// the stream they came from. Highlight rules only apply to plain lines.
    pub fn line(&self, line: &ClassifiedLine) -> StyledLine {
        let stream_color = self.palette.stream_color(line.source);
        match line.kind {
            LineKind::Downloaded => StyledLine::labeled(
                DOWNLOADED_LABEL,
                self.palette.downloaded_label,
                &line.payload,
                stream_color,
            ),
            LineKind::SavingTo => StyledLine::labeled(
                SAVING_TO_LABEL,
                self.palette.saving_label,
                &line.payload,
                stream_color,
            ),
            LineKind::Plain => {
                let color = highlight::first_match(&self.highlights, &line.payload)
                    .unwrap_or(stream_color);
                StyledLine::single(line.payload.as_str(), color)
            }
        }
    }

    /// The line announcing the command about to run.
    pub fn banner(&self, command: &impl std::fmt::Display) -> StyledLine {
        StyledLine::single(format!("{BANNER_PREFIX}{command}"), self.palette.success)
    }

    /// Render the final status message of a run.
    pub fn outcome(&self, outcome: &RunOutcome) -> StyledLine {
        if outcome.is_success() {
            StyledLine::single(SUCCESS_MESSAGE, self.palette.success)
        } else {
            StyledLine::single(
                format!("{FAILURE_PREFIX}{}", outcome.detail()),
                self.palette.failure,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    #[test]
    fn downloaded_line_has_label_and_stream_colored_token() {
        let r = Renderer::default();
        let styled = r.line(&classify("Downloaded: style.css", StreamSource::Stdout));
        assert_eq!(
            styled.fragments,
            vec![
                Fragment::new("Downloaded: ", Color::Cyan),
                Fragment::new("style.css", Color::Green),
            ]
        );
        assert_eq!(styled.plain_text(), "Downloaded: style.css");
    }

    #[test]
    fn saving_to_on_stderr_uses_stderr_color_for_path() {
        let r = Renderer::default();
        let styled = r.line(&classify("Saving to: ./index.html", StreamSource::Stderr));
        assert_eq!(
            styled.fragments,
            vec![
                Fragment::new("Saving to: ", Color::Magenta),
                Fragment::new("./index.html", Color::Yellow),
            ]
        );
    }

    #[test]
    fn plain_lines_are_unmodified() {
        let r = Renderer::default();
        let line = "  --2024-01-01 12:00:00--  https://example.com/";
        let out = r.line(&classify(line, StreamSource::Stdout));
        assert_eq!(out, StyledLine::single(line, Color::Green));

        let out = r.line(&classify(line, StreamSource::Stderr));
        assert_eq!(out, StyledLine::single(line, Color::Yellow));
    }

    #[test]
    fn highlight_rules_override_plain_color_only() {
        let rules = vec![HighlightRule::new("^Resolving", Color::Blue).unwrap()];
        let r = Renderer::new(Palette::default(), rules);

        let out = r.line(&classify("Resolving example.com", StreamSource::Stderr));
        assert_eq!(out.fragments[0].color, Some(Color::Blue));

        let out = r.line(&classify("Downloaded: Resolving", StreamSource::Stdout));
        assert_eq!(out.fragments[1].color, Some(Color::Green));
    }

    #[test]
    fn banner_names_the_command() {
        let r = Renderer::default();
        let styled = r.banner(&"wget --mirror http://example.com/");
        assert_eq!(
            styled,
            StyledLine::single(
                "Running command: wget --mirror http://example.com/",
                Color::Green
            )
        );
    }

    #[test]
    fn paint_keeps_text_when_colors_are_disabled() {
        colored::control::set_override(false);
        let styled = StyledLine::labeled("Saving to: ", Color::Magenta, "x", Color::Green);
        assert_eq!(styled.paint(), "Saving to: x");
        colored::control::unset_override();
    }
}
