//! Ordered operation log with threshold-triggered flushing
//!
//! Entries are appended in call order. Once the buffer holds at least
//! `threshold` entries, every append writes the whole buffer to the sink.
//! Under [`FlushPolicy::Retain`] nothing is dropped after a flush, so later
//! flushes repeat earlier entries; [`FlushPolicy::Clear`] empties the buffer
//! instead.
//!
//! Append, threshold check and flush happen under one lock, so concurrent
//! callers never interleave or duplicate flush output.

use crate::entry::LogEntry;
use crate::sink::{ConsoleSink, LogSink};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Entry count at which the buffer starts flushing.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 5;

/// What happens to buffered entries after they have been written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushPolicy {
    /// Keep everything; each later flush re-emits the full history.
    #[default]
    Retain,
    /// Empty the buffer once it has been written.
    Clear,
}

impl FromStr for FlushPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(FlushPolicy::Retain),
            "clear" => Ok(FlushPolicy::Clear),
            other => Err(format!("expected 'retain' or 'clear', got '{other}'")),
        }
    }
}

#[derive(Default)]
struct BufferState {
    entries: Vec<LogEntry>,
    flush_count: u64,
}

/// Shared, append-only log of audited operations.
pub struct LogBuffer {
    state: Mutex<BufferState>,
    threshold: usize,
    policy: FlushPolicy,
    sink: Box<dyn LogSink>,
}

static SHARED: LazyLock<Arc<LogBuffer>> = LazyLock::new(|| Arc::new(LogBuffer::new(ConsoleSink)));

impl LogBuffer {
    /// Buffer with the default threshold and [`FlushPolicy::Retain`].
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self {
            state: Mutex::new(BufferState::default()),
            threshold: DEFAULT_FLUSH_THRESHOLD,
            policy: FlushPolicy::Retain,
            sink: Box::new(sink),
        }
    }

    /// Flush once `threshold` entries are held. Zero is treated as one.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold.max(1);
        self
    }

    pub fn with_policy(mut self, policy: FlushPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The process-wide buffer, created on first use and never torn down.
    ///
    /// Writes to stdout with the default threshold. Prefer passing an explicit
    /// `Arc<LogBuffer>` where isolation matters.
    pub fn shared() -> Arc<LogBuffer> {
        Arc::clone(&SHARED)
    }

    /// Appends `entry`, flushing if the threshold is reached. Returns `true`
    /// when this append triggered a flush.
    pub fn append(&self, entry: LogEntry) -> bool {
        let mut state = self.lock();
        state.entries.push(entry);
        if state.entries.len() < self.threshold {
            return false;
        }

        self.sink.write_entries(&state.entries);
        state.flush_count += 1;
        debug!(
            entries = state.entries.len(),
            flush = state.flush_count,
            policy = ?self.policy,
            "operation log flushed"
        );
        if self.policy == FlushPolicy::Clear {
            state.entries.clear();
        }
        true
    }

    /// Snapshot of the buffered entries in insertion order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Number of flushes performed so far.
    pub fn flush_count(&self) -> u64 {
        self.lock().flush_count
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, BufferState> {
        // A panicking sink leaves the entry list intact; keep logging.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for LogBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBuffer")
            .field("len", &self.len())
            .field("threshold", &self.threshold)
            .field("policy", &self.policy)
            .finish()
    }
}
