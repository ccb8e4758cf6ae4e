//! # trialscribe-core
//!
//! Deterministic building blocks for TrialScribe's compliance-document
//! pipeline: the in-memory vector index, the compliance rule registry, and
//! the pipeline graph description.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same input always produces same output
//! 2. **No I/O**: embedding, generation, and ingestion live in the runtime
//! 3. **Stable ordering**: retrieval ties break by insertion order; rules
//!    evaluate in canonical registry order
//! 4. **Bounded**: the check/revise loop always terminates at the
//!    iteration cap
//!
//! ## Example
//!
//! ```rust,ignore
//! use trialscribe_core::{rules, RunState, StateDelta};
//!
//! let issues = rules::evaluate("Risks are listed. Details: TBD.");
//! assert!(issues.iter().any(|i| i.rule == "risk_mitigation"));
//!
//! let mut state = RunState::new("Write a protocol synopsis", 2);
//! state.apply(&StateDelta::issues(issues));
//! ```

pub mod graph;
pub mod index;
pub mod rules;
pub mod scoring;
pub mod types;

// Re-export main types at crate root
pub use graph::{decide_after_check, CheckOutcome};
pub use index::{IndexError, VectorIndex};
pub use rules::{ComplianceRule, RuleRegistry};
pub use scoring::{cosine_similarity, l2_norm, rank_top_k};
pub use types::{
    Chunk, ChunkMetadata, ChunkPayload, ComplianceIssue, NodeKind, RunState, SearchHit,
    StateDelta,
};
