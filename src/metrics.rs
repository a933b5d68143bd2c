use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing pipeline activity.
#[derive(Default)]
pub struct PipelineMetrics {
    runs_started: AtomicU64,
    runs_completed: AtomicU64,
    runs_failed: AtomicU64,
    characters_extracted: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a run.
    pub fn record_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed run and the length of the text it extracted.
    pub fn record_completed(&self, text_length: u64) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
        self.characters_extracted
            .fetch_add(text_length, Ordering::Relaxed);
    }

    /// Record a run that ended in the error state.
    pub fn record_failed(&self) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            runs_started: self.runs_started.load(Ordering::Relaxed),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            characters_extracted: self.characters_extracted.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Runs that passed validation and were initialized in the status tracker.
    pub runs_started: u64,
    /// Runs that reached the completed state.
    pub runs_completed: u64,
    /// Runs that reached the error state.
    pub runs_failed: u64,
    /// Total characters extracted across completed runs.
    pub characters_extracted: u64,
}
