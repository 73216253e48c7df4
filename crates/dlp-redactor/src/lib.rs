//! Redaction engine: rewrites matched spans under the MASK, HASH and REMOVE
//! strategies while preserving the surrounding text byte-for-byte.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use dlp_core::{Finding, RedactStrategy};
use dlp_policy::RedactionConfig;

/// Rewrites content given a set of findings, according to a [`RedactionConfig`].
pub struct Redactor {
    config: RedactionConfig,
}

impl Redactor {
    /// Wrap a redaction configuration.
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// Replace the wrapped configuration, e.g. after a policy reload.
    pub fn set_config(&mut self, config: RedactionConfig) {
        self.config = config;
    }

    /// Rewrite every finding's span in `content`. Findings are applied in
    /// descending order of `start` so earlier offsets stay valid as later
    /// (by position) spans are rewritten first.
    pub fn redact(&self, content: &str, findings: &[Finding]) -> String {
        let mut ordered: Vec<&Finding> = findings.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start));

        let mut result = content.to_string();
        for finding in ordered {
            let replacement = self.redact_value(&finding.matched_text);
            result.replace_range(finding.start..finding.end, &replacement);
        }
        result
    }

    /// Rewrite a single matched value in isolation, used to build the
    /// redacted snippet carried in API responses and audit records (the raw
    /// match is never placed in either).
    pub fn redact_value(&self, text: &str) -> String {
        match self.config.strategy {
            RedactStrategy::Remove => "[REDACTED]".to_string(),
            RedactStrategy::Hash => {
                format!("[REDACTED:sha256:{}]", dlp_core::hashing::sha256_short(text, 8))
            }
            RedactStrategy::Mask => self.mask(text),
        }
    }

    fn mask(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let preserve = self.config.mask_preserve_edges;
        let mask_char = self.config.mask_char;

        if len <= preserve * 2 {
            return mask_char.to_string().repeat(len);
        }

        let head: String = chars[..preserve].iter().collect();
        let tail: String = chars[len - preserve..].iter().collect();
        let middle = mask_char.to_string().repeat(len - preserve * 2);
        format!("{head}{middle}{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn finding(start: usize, end: usize, text: &str) -> Finding {
        Finding {
            scanner_type: dlp_core::ScannerType::Pii,
            finding_type: "ssn".to_string(),
            severity: dlp_core::Severity::Critical,
            matched_text: text.to_string(),
            start,
            end,
            context: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn mask_preserves_edges() {
        let redactor = Redactor::new(RedactionConfig {
            strategy: RedactStrategy::Mask,
            mask_char: '*',
            mask_preserve_edges: 4,
        });
        let content = "ssn: 123-45-6789";
        let findings = vec![finding(5, 16, "123-45-6789")];
        let redacted = redactor.redact(content, &findings);
        assert_eq!(redacted, "ssn: 123-***6789");
    }

    #[test]
    fn mask_full_when_short() {
        let redactor = Redactor::new(RedactionConfig {
            strategy: RedactStrategy::Mask,
            mask_char: '*',
            mask_preserve_edges: 4,
        });
        assert_eq!(redactor.redact_value("abc"), "***");
    }

    #[test]
    fn hash_strategy_produces_stable_fingerprint() {
        let redactor = Redactor::new(RedactionConfig {
            strategy: RedactStrategy::Hash,
            ..RedactionConfig::default()
        });
        let a = redactor.redact_value("supersecret");
        let b = redactor.redact_value("supersecret");
        assert_eq!(a, b);
        assert!(a.starts_with("[REDACTED:sha256:"));
    }

    #[test]
    fn remove_strategy_replaces_with_fixed_marker() {
        let redactor = Redactor::new(RedactionConfig { strategy: RedactStrategy::Remove, ..RedactionConfig::default() });
        assert_eq!(redactor.redact_value("anything"), "[REDACTED]");
    }

    #[test]
    fn descending_order_keeps_offsets_valid_across_multiple_findings() {
        let redactor = Redactor::new(RedactionConfig { strategy: RedactStrategy::Remove, ..RedactionConfig::default() });
        let content = "first aaa then bbb end";
        let findings = vec![finding(6, 9, "aaa"), finding(15, 18, "bbb")];
        let redacted = redactor.redact(content, &findings);
        assert_eq!(redacted, "first [REDACTED] then [REDACTED] end");
    }

    #[test]
    fn non_matching_text_is_preserved_exactly() {
        let redactor = Redactor::new(RedactionConfig { strategy: RedactStrategy::Remove, ..RedactionConfig::default() });
        let content = "prefix-SECRET-suffix";
        let findings = vec![finding(7, 13, "SECRET")];
        let redacted = redactor.redact(content, &findings);
        assert!(redacted.starts_with("prefix-"));
        assert!(redacted.ends_with("-suffix"));
    }
}
