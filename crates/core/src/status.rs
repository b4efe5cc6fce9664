//! Operator-facing connection status
//!
//! Two lines: output (link/stream side) and input (data from the
//! controller). The frame loop only writes on state changes.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

/// Severity colour of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Red,
    Orange,
    Green,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub level: StatusLevel,
}

impl StatusLine {
    fn new(text: impl Into<String>, level: StatusLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// Input and output status lines with a change flag for the display
#[derive(Debug)]
pub struct StatusBoard {
    output: RwLock<StatusLine>,
    input: RwLock<StatusLine>,
    changed: AtomicBool,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            output: RwLock::new(StatusLine::new("Initialising stream", StatusLevel::Orange)),
            input: RwLock::new(StatusLine::new("Waiting for data", StatusLevel::Orange)),
            changed: AtomicBool::new(true),
        }
    }

    pub fn set_output(&self, text: impl Into<String>, level: StatusLevel) {
        *self.output.write() = StatusLine::new(text, level);
        self.changed.store(true, Ordering::Release);
    }

    pub fn set_input(&self, text: impl Into<String>, level: StatusLevel) {
        *self.input.write() = StatusLine::new(text, level);
        self.changed.store(true, Ordering::Release);
    }

    /// Set the output line and the input line in one go, same level
    pub fn set_both(&self, output: impl Into<String>, input: impl Into<String>, level: StatusLevel) {
        *self.output.write() = StatusLine::new(output, level);
        *self.input.write() = StatusLine::new(input, level);
        self.changed.store(true, Ordering::Release);
    }

    pub fn output(&self) -> StatusLine {
        self.output.read().clone()
    }

    pub fn input(&self) -> StatusLine {
        self.input.read().clone()
    }

    /// Return and clear the change flag
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }
}
