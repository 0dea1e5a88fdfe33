//! Sender extraction and the trust rule used by categorization.

use crate::senders::Importance;

/// Domain suffixes trusted when none are configured.
pub const DEFAULT_TRUSTED_DOMAINS: &[&str] = &["example.com"];

/// Subject keyword that makes any sender important.
const URGENT_KEYWORD: &str = "urgent";

/// Pulls the sender address out of a `From` header value.
///
/// Takes the last whitespace-separated token and strips angle brackets
/// from both ends, so `"Jane Doe" <jane@example.com>` yields
/// `jane@example.com` and a bare address is returned as is.
#[must_use]
pub fn extract_sender(from: &str) -> Option<String> {
    let token = from.split_whitespace().next_back()?;
    let address = token.trim_matches(|c| c == '<' || c == '>');
    (!address.is_empty()).then(|| address.to_string())
}

/// Decides whether a sender is important.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustPolicy {
    trusted_domains: Vec<String>,
}

impl TrustPolicy {
    /// Creates a policy trusting the given domain suffixes.
    #[must_use]
    pub fn new(trusted_domains: &[String]) -> Self {
        Self {
            trusted_domains: trusted_domains.to_vec(),
        }
    }

    /// Trusted domain suffixes.
    #[must_use]
    pub fn trusted_domains(&self) -> &[String] {
        &self.trusted_domains
    }

    /// Important if the sender ends with a trusted suffix or the subject
    /// mentions "urgent" in any case.
    ///
    /// The suffix test is a plain case-sensitive string match, so
    /// `mail.example.com` and `notexample.com` both match `example.com`.
    #[must_use]
    pub fn classify(&self, sender: &str, subject: &str) -> Importance {
        let trusted = self
            .trusted_domains
            .iter()
            .any(|domain| sender.ends_with(domain.as_str()));
        let urgent = subject.to_lowercase().contains(URGENT_KEYWORD);
        Importance::from(trusted || urgent)
    }
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            trusted_domains: DEFAULT_TRUSTED_DOMAINS.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extract_display_name_form() {
        assert_eq!(
            extract_sender("\"Jane Doe\" <jane@example.com>").as_deref(),
            Some("jane@example.com")
        );
    }

    #[test]
    fn extract_bare_and_odd_forms() {
        assert_eq!(extract_sender("bob@other.org").as_deref(), Some("bob@other.org"));
        assert_eq!(extract_sender("  <x@y.z>  ").as_deref(), Some("x@y.z"));
        assert_eq!(extract_sender("Name <<a@b.c>>").as_deref(), Some("a@b.c"));
        assert_eq!(extract_sender(""), None);
        assert_eq!(extract_sender("   "), None);
        assert_eq!(extract_sender("Nobody <>"), None);
    }

    #[test]
    fn extract_keeps_last_token_rule() {
        // Trailing comments defeat the rule; that is the accepted behavior.
        assert_eq!(
            extract_sender("jane@example.com (Jane)").as_deref(),
            Some("(Jane)")
        );
    }

    #[test]
    fn classify_by_domain_suffix() {
        let policy = TrustPolicy::new(&["example.com".to_string()]);
        assert_eq!(
            policy.classify("bob@mail.example.com", "Meeting notes"),
            Importance::Important
        );
    }

    #[test]
    fn classify_by_urgent_subject() {
        let policy = TrustPolicy::new(&["example.com".to_string()]);
        assert_eq!(
            policy.classify("bob@other.org", "URGENT: respond now"),
            Importance::Important
        );
        assert_eq!(policy.classify("bob@other.org", "FYI"), Importance::Unimportant);
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        let policy = TrustPolicy::new(&["example.com".to_string()]);
        assert_eq!(policy.classify("bob@EXAMPLE.COM", "hi"), Importance::Unimportant);
    }

    #[test]
    fn empty_policy_only_trusts_urgent() {
        let policy = TrustPolicy::new(&[]);
        assert_eq!(policy.classify("a@example.com", "hello"), Importance::Unimportant);
        assert_eq!(policy.classify("a@example.com", "not so Urgent"), Importance::Important);
    }

    #[test]
    fn default_uses_default_domains() {
        assert_eq!(TrustPolicy::default().trusted_domains(), ["example.com"]);
    }

    proptest! {
        #[test]
        fn extracted_address_has_no_edge_brackets(from in "[ -~]{0,60}") {
            if let Some(address) = extract_sender(&from) {
                prop_assert!(!address.starts_with('<') && !address.ends_with('>'));
                prop_assert!(!address.contains(char::is_whitespace));
            }
        }

        #[test]
        fn angle_form_round_trips(
            name in "[A-Za-z ]{0,20}",
            local in "[a-z0-9.]{1,12}",
            domain in "[a-z]{1,10}\\.[a-z]{2,4}",
        ) {
            let address = format!("{local}@{domain}");
            let header = format!("{name} <{address}>");
            prop_assert_eq!(extract_sender(&header), Some(address));
        }
    }
}
