//! Shared detection patterns for compliance rules.
//!
//! Keeping the patterns in one place lets new rules reuse them without
//! touching rule logic, and gives the keyword checks a single definition
//! to test against.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// "TBD" as a standalone token, case-insensitive.
    pub static ref TBD_TOKEN: Regex = Regex::new(r"(?i)\btbd\b").unwrap();

    /// The spelled-out placeholder phrase, case-insensitive.
    pub static ref TO_BE_DETERMINED: Regex = Regex::new(r"(?i)to be determined").unwrap();

    pub static ref RISK: Regex = Regex::new(r"(?i)risk").unwrap();
    pub static ref MITIGATION: Regex = Regex::new(r"(?i)mitigation").unwrap();
    pub static ref CONSENT: Regex = Regex::new(r"(?i)consent").unwrap();
    pub static ref WITHDRAW: Regex = Regex::new(r"(?i)withdraw").unwrap();
}

/// Check for placeholder language ("TBD" token or "to be determined").
pub fn contains_placeholder(text: &str) -> bool {
    TBD_TOKEN.is_match(text) || TO_BE_DETERMINED.is_match(text)
}

pub fn mentions_risk(text: &str) -> bool {
    RISK.is_match(text)
}

pub fn mentions_mitigation(text: &str) -> bool {
    MITIGATION.is_match(text)
}

pub fn mentions_consent(text: &str) -> bool {
    CONSENT.is_match(text)
}

pub fn mentions_withdrawal(text: &str) -> bool {
    WITHDRAW.is_match(text)
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tbd_matches_on_word_boundaries_only() {
        assert!(contains_placeholder("The dose is TBD."));
        assert!(contains_placeholder("the dose is tbd"));
        assert!(!contains_placeholder("The TBDx compound is named."));
        assert!(!contains_placeholder("outbderly")); // no stray substring hit
    }

    #[test]
    fn spelled_out_placeholder_is_detected() {
        assert!(contains_placeholder("Enrollment is To Be Determined later."));
        assert!(!contains_placeholder("Determined investigators will decide."));
    }

    #[test]
    fn keyword_mentions_are_case_insensitive() {
        assert!(mentions_risk("Known RISKS include nausea."));
        assert!(mentions_mitigation("Mitigation strategies are listed."));
        assert!(mentions_consent("Informed Consent is obtained."));
        assert!(mentions_withdrawal("Subjects may Withdraw at any time."));
    }

    #[test]
    fn word_count_is_whitespace_delimited() {
        assert_eq!(word_count("one  two\nthree\tfour"), 4);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
    }
}
