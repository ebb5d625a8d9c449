// src/render/highlight.rs

//! Optional regex → color rules for plain output lines.

use colored::Color;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct HighlightRule {
    pattern: Regex,
    color: Color,
}

impl HighlightRule {
    pub fn new(pattern: &str, color: Color) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            color,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Color of the first rule matching `line`, in declaration order.
pub fn first_match(rules: &[HighlightRule], line: &str) -> Option<Color> {
    rules.iter().find(|r| r.is_match(line)).map(|r| r.color)
}
