//! Minimum-length rule

use crate::types::ComplianceIssue;

use super::{patterns, ComplianceRule};

/// Drafts below this whitespace-delimited word count lack enough detail.
pub const MIN_WORDS: usize = 150;

pub struct MinLengthRule {
    min_words: usize,
}

impl MinLengthRule {
    pub fn new() -> Self {
        Self {
            min_words: MIN_WORDS,
        }
    }
}

impl Default for MinLengthRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for MinLengthRule {
    fn id(&self) -> &'static str {
        "min_length"
    }

    fn check(&self, text: &str) -> Option<ComplianceIssue> {
        (patterns::word_count(text) < self.min_words).then(|| {
            ComplianceIssue::new(
                self.id(),
                format!(
                    "Provide at least ~{} words for sufficient detail.",
                    self.min_words
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_below_threshold() {
        let rule = MinLengthRule::new();
        assert!(rule.check("Too short.").is_some());
    }

    #[test]
    fn boundary_is_exclusive() {
        let rule = MinLengthRule::new();
        let at_threshold = "word ".repeat(MIN_WORDS);
        let below = "word ".repeat(MIN_WORDS - 1);
        assert!(rule.check(&at_threshold).is_none());
        assert!(rule.check(&below).is_some());
    }
}
