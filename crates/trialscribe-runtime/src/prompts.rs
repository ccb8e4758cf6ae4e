//! Prompts for the compose and revise nodes, plus the pure formatting
//! helpers that feed them.

use trialscribe_core::{ComplianceIssue, SearchHit};

/// System role for the first draft.
pub const DRAFT_SYSTEM_PROMPT: &str = "You are a clinical-trial documentation assistant. \
     Write clear, precise, and compliant text. \
     Follow retrieved guidance carefully and avoid ambiguous statements.";

/// System role for compliance-driven revision.
pub const REVISION_SYSTEM_PROMPT: &str =
    "You are a meticulous compliance editor for clinical-trial documents.";

/// Per-snippet character budget used when formatting retrieval context.
pub const DEFAULT_SNIPPET_BUDGET: usize = 350;

/// User prompt for the compose node.
pub fn draft_prompt(task: &str, context: &str) -> String {
    format!(
        "TASK: {task}\n\n\
         CONTEXT (guidance snippets):\n{context}\n\n\
         Write the requested section. Use neutral tone and professional clinical-trial style."
    )
}

/// User prompt for the revise node.
pub fn revision_prompt(draft: &str, issues: &str) -> String {
    format!(
        "Revise the DRAFT to resolve the following compliance issues. \
         Preserve meaning and structure.\n\n\
         DRAFT:\n{draft}\n\n\
         COMPLIANCE ISSUES:\n{issues}\n\n\
         Return the full revised text, improved but not overly verbose."
    )
}

/// Format retrieval hits into a bounded, numbered context block.
///
/// Each snippet is flattened to a single line and truncated to
/// `snippet_budget` characters, annotated with its source identifier.
pub fn format_context(hits: &[SearchHit], snippet_budget: usize) -> String {
    if hits.is_empty() {
        return "(no guidance retrieved)".to_string();
    }

    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let flat = hit.text.replace(['\n', '\r'], " ");
            let truncated: String = flat.chars().take(snippet_budget).collect();
            let ellipsis = if flat.chars().count() > snippet_budget {
                "..."
            } else {
                ""
            };
            format!(
                "- [{}] ({}) {}{}",
                i + 1,
                hit.metadata.source_id,
                truncated,
                ellipsis
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format compliance issues as a bullet list for the revision prompt.
pub fn format_issues(issues: &[ComplianceIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("- {}: {}", issue.rule, issue.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialscribe_core::ChunkMetadata;

    fn hit(text: &str, source: &str) -> SearchHit {
        SearchHit {
            text: text.to_string(),
            metadata: ChunkMetadata::new(source, 0),
            score: 0.5,
        }
    }

    #[test]
    fn context_is_numbered_and_annotated() {
        let hits = vec![hit("first snippet", "a.txt"), hit("second snippet", "b.txt")];
        let context = format_context(&hits, 350);
        assert!(context.contains("- [1] (a.txt) first snippet"));
        assert!(context.contains("- [2] (b.txt) second snippet"));
    }

    #[test]
    fn long_snippets_are_truncated() {
        let hits = vec![hit(&"x".repeat(400), "a.txt")];
        let context = format_context(&hits, 350);
        assert!(context.ends_with("..."));
        // "- [1] (a.txt) " prefix + 350 chars + "..."
        assert!(context.len() < 400);
    }

    #[test]
    fn newlines_are_flattened() {
        let hits = vec![hit("line one\nline two", "a.txt")];
        let context = format_context(&hits, 350);
        assert!(!context.contains("one\nline"));
    }

    #[test]
    fn empty_hits_yield_a_placeholder_block() {
        assert_eq!(format_context(&[], 350), "(no guidance retrieved)");
    }

    #[test]
    fn issues_render_as_bullets() {
        let issues = vec![
            ComplianceIssue::new("min_length", "too short"),
            ComplianceIssue::new("no_placeholders", "remove TBD"),
        ];
        assert_eq!(
            format_issues(&issues),
            "- min_length: too short\n- no_placeholders: remove TBD"
        );
    }
}
