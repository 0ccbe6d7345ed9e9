//! User-facing output channel.
//!
//! Dry-run descriptions and other status lines are written to an
//! [`OutputSink`] carried by the [`ExecutionContext`](crate::ExecutionContext)
//! rather than to a global console, so embedders decide where they go and
//! tests can capture them.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Receives complete output lines, without trailing newline.
pub trait OutputSink: Send + Sync {
    fn line(&self, line: &str);
}

/// Writes each line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn line(&self, _line: &str) {}
}

/// Records every line in memory.
///
/// # Examples
///
/// ```
/// use dandori_core::{CollectingSink, OutputSink};
///
/// let sink = CollectingSink::new();
/// sink.line("first");
/// sink.line("second");
/// assert_eq!(sink.lines(), vec!["first", "second"]);
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the lines written so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.guard().clear();
    }
}

impl OutputSink for CollectingSink {
    fn line(&self, line: &str) {
        self.guard().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_order() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());

        sink.line("a");
        sink.line("b");
        sink.line("c");

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.lines(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_collecting_sink_clear() {
        let sink = CollectingSink::new();
        sink.line("a");
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_null_sink_accepts_lines() {
        let sink: &dyn OutputSink = &NullSink;
        sink.line("ignored");
    }
}
