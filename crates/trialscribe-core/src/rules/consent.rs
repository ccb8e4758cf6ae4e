//! Consent-withdrawal rule
//!
//! Consent language must state withdrawal rights.

use crate::types::ComplianceIssue;

use super::{patterns, ComplianceRule};

pub struct ConsentWithdrawalRule;

impl ConsentWithdrawalRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsentWithdrawalRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for ConsentWithdrawalRule {
    fn id(&self) -> &'static str {
        "consent_withdrawal"
    }

    fn check(&self, text: &str) -> Option<ComplianceIssue> {
        (patterns::mentions_consent(text) && !patterns::mentions_withdrawal(text)).then(|| {
            ComplianceIssue::new(self.id(), "State withdrawal rights in consent context.")
        })
    }
}
