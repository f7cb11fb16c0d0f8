//! Single-line progress display for in-progress transcription.
//!
//! Each partial transcript overwrites the previous one in place; nothing is
//! accumulated. The line must be cleared before any other stdout print.

use std::io::{self, Write};

pub struct ProgressLine {
    shown_width: usize,
}

impl ProgressLine {
    pub fn new() -> Self {
        Self { shown_width: 0 }
    }

    /// Overwrite the progress line with the latest partial transcript.
    pub fn update(&mut self, partial: &str) {
        let line = format!("… {partial}");
        let width = line.chars().count();
        let pad = self.shown_width.saturating_sub(width);
        print!("{line}{}\r", " ".repeat(pad));
        let _ = io::stdout().flush();
        self.shown_width = self.shown_width.max(width);
    }

    /// Blank the line so normal output starts at a clean column.
    pub fn clear(&mut self) {
        if self.shown_width == 0 {
            return;
        }
        print!("{}\r", " ".repeat(self.shown_width));
        let _ = io::stdout().flush();
        self.shown_width = 0;
    }
}

impl Default for ProgressLine {
    fn default() -> Self {
        Self::new()
    }
}
