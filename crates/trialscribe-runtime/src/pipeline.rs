//! The generation state machine.
//!
//! One run walks retrieve → compose → check, then loops revise → check
//! until the draft is compliant or the iteration cap is spent. Each node
//! computes a partial state delta, merges it last-write-wins into the run
//! state, and reports it through the caller's callback — the callback sees
//! node completions in commit order.
//!
//! Node failures (embedding, generation) abort the run and surface as a
//! single error to the caller; the run state keeps whatever the completed
//! nodes produced.

use std::sync::Arc;

use thiserror::Error;

use trialscribe_core::{
    decide_after_check, CheckOutcome, NodeKind, RuleRegistry, RunState, StateDelta,
};

use crate::config::RuntimeConfig;
use crate::index::{RetrievalError, SharedIndex};
use crate::prompts;
use crate::providers::{GenerationError, GenerationProvider};

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// An executable instance of the document pipeline.
pub struct Pipeline {
    index: Arc<SharedIndex>,
    provider: Arc<dyn GenerationProvider>,
    rules: RuleRegistry,
    config: RuntimeConfig,
}

impl Pipeline {
    pub fn new(
        index: Arc<SharedIndex>,
        provider: Arc<dyn GenerationProvider>,
        rules: RuleRegistry,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            index,
            provider,
            rules,
            config,
        }
    }

    /// Run the state machine to its terminal state.
    ///
    /// `on_node` is invoked once per node completion, after the node's
    /// delta has been merged into `state`. The run executes the generation
    /// collaborator at most `max_iterations + 1` times.
    pub async fn run<F>(&self, state: &mut RunState, mut on_node: F) -> Result<(), PipelineError>
    where
        F: FnMut(NodeKind, StateDelta),
    {
        let generation = self.config.generation_config();

        // retrieve
        let hits = self
            .index
            .search(&state.task, self.config.retrieval_k)
            .await?;
        tracing::debug!(hits = hits.len(), "retrieve complete");
        let delta = StateDelta::context(prompts::format_context(&hits, self.config.snippet_budget));
        state.apply(&delta);
        on_node(NodeKind::Retrieve, delta);

        // compose
        let context = state.context.as_deref().unwrap_or_default();
        let drafted = self
            .provider
            .generate(
                prompts::DRAFT_SYSTEM_PROMPT,
                &prompts::draft_prompt(&state.task, context),
                &generation,
            )
            .await?;
        tracing::debug!(chars = drafted.text.len(), "compose complete");
        let delta = StateDelta::draft(drafted.text);
        state.apply(&delta);
        on_node(NodeKind::Compose, delta);

        loop {
            // check
            let draft = state.draft.as_deref().unwrap_or_default();
            let issues = self.rules.evaluate(draft);
            tracing::debug!(
                issues = issues.len(),
                iteration = state.iteration,
                "check complete"
            );
            let outcome = decide_after_check(&issues, state.iteration, state.max_iterations);
            let delta = StateDelta::issues(issues);
            state.apply(&delta);
            on_node(NodeKind::Check, delta);

            match outcome {
                CheckOutcome::End => return Ok(()),
                CheckOutcome::Revise => {
                    let draft = state.draft.as_deref().unwrap_or_default();
                    let issues = state.issues.as_deref().unwrap_or_default();
                    let revised = self
                        .provider
                        .generate(
                            prompts::REVISION_SYSTEM_PROMPT,
                            &prompts::revision_prompt(draft, &prompts::format_issues(issues)),
                            &generation,
                        )
                        .await?;
                    let delta = StateDelta {
                        draft: Some(revised.text),
                        iteration: Some(state.iteration + 1),
                        ..Default::default()
                    };
                    state.apply(&delta);
                    on_node(NodeKind::Revise, delta);
                }
            }
        }
    }
}
