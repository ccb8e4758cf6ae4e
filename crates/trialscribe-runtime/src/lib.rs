//! # trialscribe-runtime
//!
//! Asynchronous orchestration for TrialScribe: embedding and retrieval
//! over a shared index, generation providers, the document pipeline, and
//! the job coordinator with replayable event streams.
//!
//! The deterministic pieces (rules, scoring, routing) live in
//! `trialscribe-core`; this crate wires them to the world.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trialscribe_core::RuleRegistry;
//! use trialscribe_runtime::{
//!     CachedEmbedder, HashEmbedder, JobCoordinator, Pipeline, RuntimeConfig, SharedIndex,
//! };
//!
//! let embedder = Arc::new(CachedEmbedder::with_defaults(HashEmbedder::default()));
//! let index = Arc::new(SharedIndex::new(embedder));
//! index.rebuild(chunks).await?;
//!
//! let pipeline = Arc::new(Pipeline::new(
//!     index,
//!     provider,
//!     RuleRegistry::standard(),
//!     RuntimeConfig::default(),
//! ));
//! let coordinator = JobCoordinator::new(pipeline);
//!
//! let job = coordinator.submit("Write a protocol synopsis", 2);
//! let mut events = coordinator.subscribe(&job);
//! while let Some(record) = events.recv().await {
//!     println!("{record:?}");
//! }
//! ```

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod embedding;
pub mod events;
pub mod index;
pub mod ingest;
pub mod pipeline;
pub mod prompts;
pub mod providers;

// Re-export main types at crate root
pub use cache::CachedEmbedder;
pub use config::{ConfigError, RuntimeConfig};
pub use coordinator::{EventStream, JobCoordinator, JobId};
pub use embedding::{EmbeddingError, EmbeddingProvider, HashEmbedder};
pub use events::{EventRecord, JobEvent};
pub use index::{RetrievalError, SharedIndex};
pub use ingest::{chunk_text, load_directory, IngestError};
pub use pipeline::{Pipeline, PipelineError};
pub use providers::{
    Generation, GenerationConfig, GenerationError, GenerationProvider, TokenUsage,
};

#[cfg(feature = "anthropic")]
pub use providers::AnthropicProvider;
