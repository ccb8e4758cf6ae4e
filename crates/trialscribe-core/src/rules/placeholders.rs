//! No-placeholders rule
//!
//! Drafted compliance text must not ship with "TBD" markers or
//! "to be determined" phrasing.

use crate::types::ComplianceIssue;

use super::{patterns, ComplianceRule};

pub struct PlaceholderRule;

impl PlaceholderRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlaceholderRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for PlaceholderRule {
    fn id(&self) -> &'static str {
        "no_placeholders"
    }

    fn check(&self, text: &str) -> Option<ComplianceIssue> {
        patterns::contains_placeholder(text)
            .then(|| ComplianceIssue::new(self.id(), "Remove TBD/placeholder language."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_on_tbd_token() {
        let rule = PlaceholderRule::new();
        let issue = rule.check("Dosage schedule: TBD").unwrap();
        assert_eq!(issue.rule, "no_placeholders");
    }

    #[test]
    fn triggers_on_spelled_out_phrase() {
        let rule = PlaceholderRule::new();
        assert!(rule.check("The endpoint is to be determined.").is_some());
    }

    #[test]
    fn passes_clean_text() {
        let rule = PlaceholderRule::new();
        assert!(rule.check("The endpoint is overall survival.").is_none());
    }
}
