//! Concurrent per-document status tracking.
//!
//! [`StatusTracker`] owns one [`ProcessingStatus`] per document id behind a single coarse
//! `RwLock`. Statuses are small and every critical section is a map lookup plus a clone or
//! replace, so readers never wait long and never observe a half-written status.
//!
//! Each [`StatusTracker::initialize`] call opens a new generation for the id and hands back a
//! [`RunTicket`]. Mutations carry the ticket; writes from a superseded generation are dropped.

use std::collections::HashMap;
use std::sync::{
    PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};
use std::time::{Duration, Instant};
use thiserror::Error;

use super::types::{
    DocumentId, ProcessingResult, ProcessingStatus, ResubmissionPolicy, RunState, now_rfc3339,
};

/// Errors raised by the status tracker.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    /// No status exists for the id.
    #[error("No processing status recorded for document {0}")]
    NotFound(DocumentId),
    /// A run is in flight and the policy forbids starting another.
    #[error("Document {0} is already being processed")]
    InFlight(DocumentId),
}

/// Proof of ownership over one run's status record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    document_id: DocumentId,
    generation: u64,
}

impl RunTicket {
    /// Document the ticket writes to.
    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }
}

struct Entry {
    generation: u64,
    status: ProcessingStatus,
    touched: Instant,
}

/// Process-lifetime map from document id to its latest status.
pub struct StatusTracker {
    entries: RwLock<HashMap<DocumentId, Entry>>,
    next_generation: AtomicU64,
    policy: ResubmissionPolicy,
    ttl: Option<Duration>,
}

impl StatusTracker {
    /// Create a tracker with the given re-submission policy and optional retention window.
    pub fn new(policy: ResubmissionPolicy, ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
            policy,
            ttl,
        }
    }

    /// Start a run for `document_id` at progress 0.
    ///
    /// Under [`ResubmissionPolicy::RejectInFlight`] this fails while the current status is
    /// still `processing`. Expired terminal statuses are evicted first.
    pub fn initialize(&self, document_id: DocumentId) -> Result<RunTicket, StatusError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        self.evict_expired(&mut entries);

        if self.policy == ResubmissionPolicy::RejectInFlight
            && entries
                .get(&document_id)
                .is_some_and(|entry| !entry.status.status.is_terminal())
        {
            return Err(StatusError::InFlight(document_id));
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        if let Some(previous) = entries
            .get(&document_id)
            .filter(|entry| !entry.status.status.is_terminal())
        {
            tracing::warn!(
                document_id,
                superseded = previous.generation,
                generation,
                "Superseding in-flight run"
            );
        }
        entries.insert(
            document_id,
            Entry {
                generation,
                status: ProcessingStatus {
                    document_id,
                    status: RunState::Processing,
                    progress: 0,
                    message: "Starting processing".into(),
                    result: None,
                    updated_at: now_rfc3339(),
                },
                touched: Instant::now(),
            },
        );
        Ok(RunTicket {
            document_id,
            generation,
        })
    }

    /// Publish an intermediate checkpoint. Returns `false` when the write was discarded.
    pub fn advance(&self, ticket: &RunTicket, progress: u8, message: impl Into<String>) -> bool {
        let message = message.into();
        self.replace(ticket, |current| {
            if current.status.is_terminal() {
                return None;
            }
            Some(ProcessingStatus {
                document_id: current.document_id,
                status: RunState::Processing,
                progress: progress.clamp(current.progress, 100),
                message,
                result: None,
                updated_at: now_rfc3339(),
            })
        })
    }

    /// Transition to `completed` at progress 100 with the final result.
    pub fn complete(&self, ticket: &RunTicket, result: ProcessingResult) -> bool {
        self.replace(ticket, |current| {
            if current.status.is_terminal() {
                return None;
            }
            Some(ProcessingStatus {
                document_id: current.document_id,
                status: RunState::Completed,
                progress: 100,
                message: "Processing completed".into(),
                result: Some(result),
                updated_at: now_rfc3339(),
            })
        })
    }

    /// Transition to `error`, keeping the last published progress.
    pub fn fail(&self, ticket: &RunTicket, message: impl Into<String>) -> bool {
        let message = message.into();
        self.replace(ticket, |current| {
            if current.status.is_terminal() {
                return None;
            }
            Some(ProcessingStatus {
                document_id: current.document_id,
                status: RunState::Error,
                progress: current.progress,
                message,
                result: None,
                updated_at: now_rfc3339(),
            })
        })
    }

    /// Fetch a copy of the current status.
    pub fn get(&self, document_id: DocumentId) -> Result<ProcessingStatus, StatusError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&document_id)
            .filter(|entry| !self.is_expired(entry, Instant::now()))
            .map(|entry| entry.status.clone())
            .ok_or(StatusError::NotFound(document_id))
    }

    /// Number of statuses currently retained.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no statuses are retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn replace<F>(&self, ticket: &RunTicket, next: F) -> bool
    where
        F: FnOnce(&ProcessingStatus) -> Option<ProcessingStatus>,
    {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = entries.get_mut(&ticket.document_id) else {
            tracing::debug!(document_id = ticket.document_id, "Status evicted; dropping write");
            return false;
        };
        if entry.generation != ticket.generation {
            tracing::debug!(
                document_id = ticket.document_id,
                stale = ticket.generation,
                current = entry.generation,
                "Dropping write from superseded run"
            );
            return false;
        }
        match next(&entry.status) {
            Some(status) => {
                entry.status = status;
                entry.touched = Instant::now();
                true
            }
            None => false,
        }
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => {
                entry.status.status.is_terminal() && now.duration_since(entry.touched) >= ttl
            }
            None => false,
        }
    }

    fn evict_expired(&self, entries: &mut HashMap<DocumentId, Entry>) {
        if self.ttl.is_none() {
            return;
        }
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted expired statuses");
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new(ResubmissionPolicy::default(), None)
    }
}
