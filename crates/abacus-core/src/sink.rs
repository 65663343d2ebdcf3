//! Output sinks for flushed log entries

use crate::entry::LogEntry;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Destination that receives entries when the buffer flushes.
pub trait LogSink: Send + Sync {
    /// Writes `entries` in the order given.
    fn write_entries(&self, entries: &[LogEntry]);
}

/// Prints each entry on its own line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write_entries(&self, entries: &[LogEntry]) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for entry in entries {
            // A closed stdout must not take the calculation down with it.
            let _ = writeln!(out, "{entry}");
        }
    }
}

/// Emits each entry as a `tracing` event on the `abacus::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_entries(&self, entries: &[LogEntry]) {
        for entry in entries {
            info!(target: "abacus::audit", "{}", entry);
        }
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write_entries(&self, _entries: &[LogEntry]) {}
}

/// Keeps every written line in memory; clones share the same storage.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, across all flushes.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn write_entries(&self, entries: &[LogEntry]) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.extend(entries.iter().map(|entry| entry.as_str().to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_shares_storage() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        sink.write_entries(&[LogEntry::from("a".to_string()), LogEntry::from("b".to_string())]);
        assert_eq!(handle.lines(), vec!["a", "b"]);

        handle.clear();
        assert!(sink.lines().is_empty());
    }
}
