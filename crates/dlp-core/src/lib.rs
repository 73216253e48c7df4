//! Shared enums, value types, and small utilities used across the DLP
//! inspection crates.

#![deny(unsafe_code)]

/// Version of the core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Severity of a finding, totally ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    fn rank(self) -> u8 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
            Severity::Critical => 3,
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Enforcement verdict returned by the policy evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Allow,
    Block,
    Redact,
    /// Opt-in verdict carrying a suggested underlying action; see
    /// [`Severity`]-gated `prompt_threshold` in `dlp-policy`.
    Prompt,
}

/// Scanner family a finding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScannerType {
    Secret,
    Pii,
    Custom,
}

impl ScannerType {
    /// Lowercase wire identifier, matching policy document and API values.
    pub fn as_str(self) -> &'static str {
        match self {
            ScannerType::Secret => "secret",
            ScannerType::Pii => "pii",
            ScannerType::Custom => "custom",
        }
    }
}

/// Redaction scheme applied to a matched span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactStrategy {
    Mask,
    Hash,
    Remove,
}

impl Default for RedactStrategy {
    fn default() -> Self {
        RedactStrategy::Mask
    }
}

/// One concrete occurrence of sensitive content inside a scanned string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub scanner_type: ScannerType,
    /// Pattern name, or `"high_entropy_string"` for the entropy heuristic.
    pub finding_type: String,
    pub severity: Severity,
    pub matched_text: String,
    /// Half-open byte offsets `[start, end)` into the scanned content.
    pub start: usize,
    pub end: usize,
    /// Up to 30 bytes of surrounding context on each side, clamped to bounds.
    pub context: String,
    #[serde(default)]
    pub metadata: std::collections::BTreeMap<String, String>,
}

/// Errors shared by downstream crates at their I/O and validation boundaries.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid regex pattern {name:?}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid severity value: {0}")]
    InvalidSeverity(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub mod ids {
    //! Monotonic request ids and wall-clock timestamps used for audit rows
    //! and tracing spans.

    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static NEXT_ID: AtomicU64 = AtomicU64::new(1);

    /// Generate a new monotonic identifier (starts at 1), unique per process.
    pub fn next_monotonic_id() -> u64 {
        NEXT_ID.fetch_add(1, Ordering::Relaxed)
    }

    /// Milliseconds since the UNIX epoch.
    pub fn now_ms() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as u64
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn monotonic_increments() {
            let a = next_monotonic_id();
            let b = next_monotonic_id();
            assert!(b > a);
        }
    }
}

pub mod hashing {
    //! Content hashing. Raw scanned text is never persisted; only digests
    //! and redacted snippets cross the audit boundary.

    use sha2::{Digest, Sha256};

    /// Full lowercase hex SHA-256 digest of `content`.
    pub fn sha256_hex(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// First `length` hex characters of the SHA-256 digest of `content`,
    /// used for the `[REDACTED:sha256:...]` placeholder.
    pub fn sha256_short(content: &str, length: usize) -> String {
        let full = sha256_hex(content);
        full.chars().take(length).collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn known_digest() {
            assert_eq!(
                sha256_hex(""),
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
            );
        }

        #[test]
        fn short_is_prefix_of_full() {
            let full = sha256_hex("hello world");
            let short = sha256_short("hello world", 8);
            assert_eq!(short.len(), 8);
            assert!(full.starts_with(&short));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_max() {
        let severities = [Severity::Low, Severity::Critical, Severity::Medium];
        assert_eq!(severities.iter().copied().max(), Some(Severity::Critical));
    }

    #[test]
    fn scanner_type_wire_values() {
        assert_eq!(ScannerType::Secret.as_str(), "secret");
        assert_eq!(ScannerType::Pii.as_str(), "pii");
        assert_eq!(ScannerType::Custom.as_str(), "custom");
    }
}
