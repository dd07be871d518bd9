//! Append-only transcript sinks for tool output and session messages.

use std::collections::VecDeque;

/// Receives transcript lines, one at a time, in order.
pub trait Transcript {
    /// Appends one line. Implementations must not reorder lines.
    fn append(&mut self, line: &str);
}

/// Default number of lines kept by [`MemoryTranscript`].
pub const DEFAULT_MAX_LINES: usize = 10_000;

/// A bounded in-memory transcript that drops its oldest lines first.
#[derive(Clone, Debug)]
pub struct MemoryTranscript {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl MemoryTranscript {
    /// Creates an empty transcript holding up to [`DEFAULT_MAX_LINES`] lines.
    pub fn new() -> Self {
        Self::with_max_lines(DEFAULT_MAX_LINES)
    }

    /// Creates an empty transcript holding up to `max_lines` lines.
    pub fn with_max_lines(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    /// Returns the retained lines, oldest first.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.lines.iter().map(String::as_str)
    }

    /// Returns the number of retained lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no lines are retained.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns `true` if any retained line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Removes every retained line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for MemoryTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript for MemoryTranscript {
    fn append(&mut self, line: &str) {
        self.lines.push_back(line.to_string());
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Prints every line to stdout as it arrives.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutTranscript;

impl Transcript for StdoutTranscript {
    fn append(&mut self, line: &str) {
        println!("{line}");
    }
}

impl<T: Transcript + ?Sized> Transcript for Box<T> {
    fn append(&mut self, line: &str) {
        (**self).append(line);
    }
}
