//! Job coordinator: asynchronous pipeline runs with replayable event
//! streams.
//!
//! Submitting a task spawns one tokio task that drives a [`Pipeline`] run
//! to completion. Every node completion is committed to the job's
//! append-only event log and fanned out to the currently attached
//! subscribers inside a single critical section, so every subscriber —
//! live or late-joining — observes the same sequence in the same order.
//!
//! A failed run terminates its own job with an error event; it never
//! affects other jobs or the coordinator itself.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use trialscribe_core::RunState;

use crate::events::{EventRecord, JobEvent};
use crate::pipeline::Pipeline;

/// Opaque unique job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A subscriber's receiving end: the full buffered prefix followed by live
/// events; the channel closes after the terminal event.
pub type EventStream = mpsc::UnboundedReceiver<EventRecord>;

struct Job {
    events: Vec<EventRecord>,
    result: Option<RunState>,
    completed: bool,
    subscribers: Vec<mpsc::UnboundedSender<EventRecord>>,
}

impl Job {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            result: None,
            completed: false,
            subscribers: Vec::new(),
        }
    }

    /// Commit an event and fan it out to attached subscribers.
    /// Must be called with the job lock held.
    fn append(&mut self, event: JobEvent) {
        let record = EventRecord {
            seq: self.events.len() as u64,
            ts: Utc::now(),
            event,
        };
        self.events.push(record.clone());
        self.subscribers.retain(|tx| tx.send(record.clone()).is_ok());
    }

    /// Close the job: no further events are accepted, attached subscriber
    /// channels are dropped so their streams end after the buffered tail.
    fn close(&mut self, result: RunState) {
        self.result = Some(result);
        self.completed = true;
        self.subscribers.clear();
    }
}

/// Runs one pipeline instance per submitted task and serves each job's
/// event log to any number of subscribers.
pub struct JobCoordinator {
    pipeline: Arc<Pipeline>,
    jobs: Mutex<HashMap<JobId, Arc<Mutex<Job>>>>,
}

impl JobCoordinator {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Start a job and return its identifier immediately.
    ///
    /// The pipeline runs on its own tokio task; progress is observable via
    /// [`JobCoordinator::subscribe`].
    pub fn submit(&self, task: impl Into<String>, max_iterations: u32) -> JobId {
        let id = JobId::generate();
        let job = Arc::new(Mutex::new(Job::new()));
        self.jobs.lock().insert(id.clone(), Arc::clone(&job));

        let pipeline = Arc::clone(&self.pipeline);
        let task = task.into();
        let job_id = id.clone();

        tokio::spawn(async move {
            let mut state = RunState::new(task, max_iterations);
            let node_job = Arc::clone(&job);

            let outcome = pipeline
                .run(&mut state, move |node, delta| {
                    let mut guard = node_job.lock();
                    if !guard.completed {
                        guard.append(JobEvent::Node { node, delta });
                    }
                })
                .await;

            let mut guard = job.lock();
            match outcome {
                Ok(()) => {
                    guard.append(JobEvent::Final {
                        result: state.clone(),
                    });
                    guard.append(JobEvent::Done);
                    guard.close(state);
                    tracing::info!(job = %job_id, "job completed");
                }
                Err(error) => {
                    guard.append(JobEvent::Error {
                        message: error.to_string(),
                    });
                    // Whatever the completed nodes produced stays
                    // inspectable.
                    guard.close(state);
                    tracing::warn!(job = %job_id, error = %error, "job failed");
                }
            }
        });

        id
    }

    /// Attach a subscriber to a job's event stream.
    ///
    /// The stream first replays the entire buffered log in original order,
    /// then carries live events until the terminal one. Subscribing to a
    /// completed job replays the log (ending in its terminal event) and
    /// closes. An unknown identifier yields a single error event.
    pub fn subscribe(&self, id: &JobId) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();

        let job = self.jobs.lock().get(id).cloned();
        match job {
            Some(job) => {
                let mut guard = job.lock();
                for record in &guard.events {
                    let _ = tx.send(record.clone());
                }
                if !guard.completed {
                    guard.subscribers.push(tx);
                }
                // Completed jobs drop the sender: the stream ends after
                // the buffered tail.
            }
            None => {
                let _ = tx.send(EventRecord {
                    seq: 0,
                    ts: Utc::now(),
                    event: JobEvent::Error {
                        message: "no such job".to_string(),
                    },
                });
            }
        }

        rx
    }

    /// The job's final (or at-failure) run state, once the job closed.
    pub fn result(&self, id: &JobId) -> Option<RunState> {
        let job = self.jobs.lock().get(id).cloned()?;
        let guard = job.lock();
        guard.result.clone()
    }

    /// Whether the job exists and has reached its terminal event.
    pub fn is_completed(&self, id: &JobId) -> Option<bool> {
        let job = self.jobs.lock().get(id).cloned()?;
        let completed = job.lock().completed;
        Some(completed)
    }
}
