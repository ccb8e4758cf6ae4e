//! Shared data model for the TrialScribe pipeline.

use serde::{Deserialize, Serialize};

/// Provenance of an ingested reference chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Identifier of the source document (typically a file name).
    pub source_id: String,

    /// Zero-based position of this chunk within its source.
    pub chunk_index: usize,
}

impl ChunkMetadata {
    pub fn new(source_id: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            source_id: source_id.into(),
            chunk_index,
        }
    }
}

/// A chunk of reference text as produced by an extraction collaborator,
/// before it has been embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl ChunkPayload {
    pub fn new(text: impl Into<String>, source_id: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            text: text.into(),
            metadata: ChunkMetadata::new(source_id, chunk_index),
        }
    }
}

/// A unit of ingested reference text with its embedding vector.
///
/// Immutable once added to an index; owned exclusively by the index that
/// holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub vector: Vec<f32>,
}

/// A named, human-readable violation of a documentation rule.
///
/// Produced fresh on every evaluation; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceIssue {
    /// Stable rule identifier, e.g. `no_placeholders`.
    pub rule: String,

    /// What the author has to fix.
    pub message: String,
}

impl ComplianceIssue {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// One ranked retrieval result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    pub metadata: ChunkMetadata,
    /// Cosine similarity against the query (higher is closer).
    pub score: f32,
}

/// One named step of the pipeline state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Retrieve,
    Compose,
    Check,
    Revise,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Retrieve => "retrieve",
            NodeKind::Compose => "compose",
            NodeKind::Check => "check",
            NodeKind::Revise => "revise",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The working memory of one generation-pipeline run.
///
/// Each node produces a [`StateDelta`] that is merged into the prior state
/// via [`RunState::apply`]. Merging is last-write-wins per field, never
/// accumulation: a later `draft` fully replaces an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// The drafting task as submitted.
    pub task: String,

    /// Formatted retrieval context, set by the retrieve node.
    pub context: Option<String>,

    /// Current draft text, set by compose and replaced by revise.
    pub draft: Option<String>,

    /// Issues from the most recent check, empty when compliant.
    pub issues: Option<Vec<ComplianceIssue>>,

    /// Completed revise round-trips.
    pub iteration: u32,

    /// Upper bound on revise round-trips.
    pub max_iterations: u32,
}

impl RunState {
    /// Create the initial state for a submitted task.
    pub fn new(task: impl Into<String>, max_iterations: u32) -> Self {
        Self {
            task: task.into(),
            context: None,
            draft: None,
            issues: None,
            iteration: 0,
            max_iterations,
        }
    }

    /// Merge a node's partial update into this state.
    ///
    /// Fields absent from the delta are left untouched; fields present
    /// overwrite unconditionally.
    pub fn apply(&mut self, delta: &StateDelta) {
        if let Some(context) = &delta.context {
            self.context = Some(context.clone());
        }
        if let Some(draft) = &delta.draft {
            self.draft = Some(draft.clone());
        }
        if let Some(issues) = &delta.issues {
            self.issues = Some(issues.clone());
        }
        if let Some(iteration) = delta.iteration {
            self.iteration = iteration;
        }
    }
}

/// Partial state update produced by one node execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ComplianceIssue>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration: Option<u32>,
}

impl StateDelta {
    pub fn context(value: impl Into<String>) -> Self {
        Self {
            context: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn draft(value: impl Into<String>) -> Self {
        Self {
            draft: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn issues(value: Vec<ComplianceIssue>) -> Self {
        Self {
            issues: Some(value),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overwrites_only_present_fields() {
        let mut state = RunState::new("write a synopsis", 2);
        state.apply(&StateDelta::context("guidance"));
        state.apply(&StateDelta::draft("first draft"));

        assert_eq!(state.context.as_deref(), Some("guidance"));
        assert_eq!(state.draft.as_deref(), Some("first draft"));
        assert_eq!(state.iteration, 0);
    }

    #[test]
    fn apply_is_last_write_wins() {
        let mut state = RunState::new("task", 2);
        state.apply(&StateDelta::draft("v1"));
        state.apply(&StateDelta::draft("v2"));

        assert_eq!(state.draft.as_deref(), Some("v2"));
    }

    #[test]
    fn apply_replaces_issues_instead_of_accumulating() {
        let mut state = RunState::new("task", 2);
        state.apply(&StateDelta::issues(vec![
            ComplianceIssue::new("min_length", "too short"),
            ComplianceIssue::new("no_placeholders", "remove TBD"),
        ]));
        state.apply(&StateDelta::issues(vec![]));

        assert_eq!(state.issues.as_deref(), Some(&[][..]));
    }

    #[test]
    fn delta_serializes_without_absent_fields() {
        let json = serde_json::to_string(&StateDelta::draft("text")).unwrap();
        assert_eq!(json, r#"{"draft":"text"}"#);
    }
}
