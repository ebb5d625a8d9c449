// src/classify.rs

//! Line classification for mirroring-tool output.
//!
//! Every line read from the child process is mapped to a [`ClassifiedLine`].
//! Classification never fails: anything that does not fit one of the known
//! shapes is kept as a [`LineKind::Plain`] line carrying the original text.

use std::fmt;

pub const DOWNLOADED_MARKER: &str = "Downloaded:";
pub const SAVING_TO_MARKER: &str = "Saving to:";

/// Which output stream of the child a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamSource {
    Stdout,
    Stderr,
}

impl StreamSource {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamSource::Stdout => "stdout",
            StreamSource::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A resource finished downloading; payload is its identifier.
    Downloaded,
    /// The tool announced a destination; payload is the path text.
    SavingTo,
    /// Anything else; payload is the full line.
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub kind: LineKind,
    pub payload: String,
    pub source: StreamSource,
}

impl ClassifiedLine {
    pub fn is_download(&self) -> bool {
        self.kind == LineKind::Downloaded
    }
}

/// Classify one line of output.
///
/// - `Downloaded:` lines with at least two whitespace-separated tokens keep
///   the second token.
/// - `Saving to:` lines keep everything after `"Saving to: "` verbatim.
/// - Malformed variants of both fall back to `Plain`.
pub fn classify(line: &str, source: StreamSource) -> ClassifiedLine {
    if line.contains(DOWNLOADED_MARKER) {
        if let Some(token) = line.split_whitespace().nth(1) {
            return ClassifiedLine {
                kind: LineKind::Downloaded,
                payload: token.to_string(),
                source,
            };
        }
    }

    if let Some(path) = saving_to_payload(line) {
        return ClassifiedLine {
            kind: LineKind::SavingTo,
            payload: path.to_string(),
            source,
        };
    }

    ClassifiedLine {
        kind: LineKind::Plain,
        payload: line.to_string(),
        source,
    }
}

fn saving_to_payload(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(SAVING_TO_MARKER)?;
    // The separator space belongs to the marker, not to the path.
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    if rest.is_empty() { None } else { Some(rest) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downloaded_line_keeps_second_token() {
        let c = classify("Downloaded: index.html", StreamSource::Stdout);
        assert_eq!(c.kind, LineKind::Downloaded);
        assert_eq!(c.payload, "index.html");
        assert_eq!(c.source, StreamSource::Stdout);
        assert!(c.is_download());
    }

    #[test]
    fn downloaded_summary_line_keeps_only_second_token() {
        let c = classify(
            "Downloaded: 15 files, 1.2M in 0.3s (4.1 MB/s)",
            StreamSource::Stderr,
        );
        assert_eq!(c.kind, LineKind::Downloaded);
        assert_eq!(c.payload, "15");
    }

    #[test]
    fn downloaded_without_token_is_plain() {
        let c = classify("Downloaded:", StreamSource::Stdout);
        assert_eq!(c.kind, LineKind::Plain);
        assert_eq!(c.payload, "Downloaded:");
        assert!(!c.is_download());
    }

    #[test]
    fn downloaded_with_trailing_whitespace_only_is_plain() {
        let c = classify("Downloaded:   \t", StreamSource::Stdout);
        assert_eq!(c.kind, LineKind::Plain);
        assert_eq!(c.payload, "Downloaded:   \t");
    }

    #[test]
    fn saving_to_keeps_remainder_verbatim() {
        let c = classify("Saving to: ‘example.com/index.html’", StreamSource::Stderr);
        assert_eq!(c.kind, LineKind::SavingTo);
        assert_eq!(c.payload, "‘example.com/index.html’");

        let c = classify("Saving to: ./a b  ", StreamSource::Stdout);
        assert_eq!(c.payload, "./a b  ");
    }

    #[test]
    fn saving_to_splits_on_first_occurrence() {
        let c = classify("Saving to: x Saving to: y", StreamSource::Stdout);
        assert_eq!(c.kind, LineKind::SavingTo);
        assert_eq!(c.payload, "x Saving to: y");
    }

    #[test]
    fn saving_to_with_nothing_after_is_plain() {
        for line in ["Saving to:", "Saving to: "] {
            let c = classify(line, StreamSource::Stdout);
            assert_eq!(c.kind, LineKind::Plain, "line {line:?}");
            assert_eq!(c.payload, line);
        }
    }

    #[test]
    fn malformed_downloaded_can_still_be_saving_to() {
        let c = classify("Downloaded: Saving to: out", StreamSource::Stdout);
        // Two tokens exist, so the download rule wins.
        assert_eq!(c.kind, LineKind::Downloaded);
        assert_eq!(c.payload, "Saving");
    }

    #[test]
    fn other_lines_are_plain_and_unmodified() {
        let line = "Resolving example.com (example.com)... 93.184.216.34";
        let c = classify(line, StreamSource::Stderr);
        assert_eq!(c.kind, LineKind::Plain);
        assert_eq!(c.payload, line);
        assert_eq!(c.source, StreamSource::Stderr);
    }
}
