//! Risk-mitigation rule
//!
//! Any discussion of risk has to be paired with mitigation language.

use crate::types::ComplianceIssue;

use super::{patterns, ComplianceRule};

pub struct RiskMitigationRule;

impl RiskMitigationRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RiskMitigationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for RiskMitigationRule {
    fn id(&self) -> &'static str {
        "risk_mitigation"
    }

    fn check(&self, text: &str) -> Option<ComplianceIssue> {
        (patterns::mentions_risk(text) && !patterns::mentions_mitigation(text)).then(|| {
            ComplianceIssue::new(
                self.id(),
                "Mention risk mitigation when risks are discussed.",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_on_unmitigated_risk() {
        let rule = RiskMitigationRule::new();
        assert!(rule.check("Known risks include fatigue.").is_some());
    }

    #[test]
    fn passes_when_mitigation_is_present() {
        let rule = RiskMitigationRule::new();
        assert!(rule
            .check("Known risks include fatigue; mitigation measures apply.")
            .is_none());
    }

    #[test]
    fn passes_when_risk_is_not_mentioned() {
        let rule = RiskMitigationRule::new();
        assert!(rule.check("The schedule of assessments is fixed.").is_none());
    }
}
