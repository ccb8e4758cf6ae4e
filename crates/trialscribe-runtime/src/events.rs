//! Job events and their on-the-wire envelope.
//!
//! A job's event log is the authoritative record of its run: one
//! [`JobEvent::Node`] per node completion, then `Final` and `Done` (or a
//! single `Error`). The log is append-only and replayed verbatim to late
//! subscribers, so the serialized form of a record never changes after it
//! is committed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trialscribe_core::{NodeKind, RunState, StateDelta};

/// An event in a job's lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    /// One node finished and contributed a state delta.
    Node { node: NodeKind, delta: StateDelta },

    /// The pipeline reached its terminal state with this result.
    Final { result: RunState },

    /// Stream closure after a successful run.
    Done,

    /// Stream closure after a failure.
    Error { message: String },
}

impl JobEvent {
    /// Whether this event closes the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobEvent::Done | JobEvent::Error { .. })
    }
}

/// A committed event with its position and commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Zero-based position in the job's event log.
    pub seq: u64,

    /// Commit timestamp.
    pub ts: DateTime<Utc>,

    #[serde(flatten)]
    pub event: JobEvent,
}
