// src/render/memory.rs

//! In-memory sink that records everything written to it.

use std::sync::{Arc, Mutex};

use super::{OutputSink, StyledLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Line(StyledLine),
    Progress(String),
}

/// Cloneable recording sink; clones share the same event log.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .map(|g| g.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Unstyled text of every recorded line, in write order.
    pub fn lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Line(l) => Some(l.plain_text()),
                SinkEvent::Progress(_) => None,
            })
            .collect()
    }

    pub fn styled_lines(&self) -> Vec<StyledLine> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Line(l) => Some(l),
                SinkEvent::Progress(_) => None,
            })
            .collect()
    }

    pub fn progress_frames(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Progress(f) => Some(f),
                SinkEvent::Line(_) => None,
            })
            .collect()
    }

    fn push(&self, event: SinkEvent) {
        match self.events.lock() {
            Ok(mut g) => g.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl OutputSink for MemorySink {
    fn line(&self, line: &StyledLine) {
        self.push(SinkEvent::Line(line.clone()));
    }

    fn progress(&self, frame: &str) {
        self.push(SinkEvent::Progress(frame.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use colored::Color;

    use super::*;

    #[test]
    fn clones_share_the_log() {
        let sink = MemorySink::new();
        let writer = sink.clone();

        writer.line(&StyledLine::single("hello", Color::Green));
        writer.progress("\rProgress: [] 0.00%");
        writer.line(&StyledLine::single("bye", Color::Green));

        assert_eq!(sink.lines(), vec!["hello", "bye"]);
        assert_eq!(sink.progress_frames(), vec!["\rProgress: [] 0.00%"]);
        assert_eq!(sink.events().len(), 3);
    }
}
