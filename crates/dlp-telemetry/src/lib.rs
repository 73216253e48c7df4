//! Structured logging bootstrap and low-cardinality decision counters.

#![deny(unsafe_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Errors raised while wiring up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("logging already initialized")]
    AlreadyInitialized,
}

/// Initialize JSON-structured logging with an env filter. Controlled by
/// `RUST_LOG`, e.g. `info,dlp_service=debug`. Safe to call once per process;
/// subsequent calls are no-ops.
pub fn init_json_logging() {
    let fmt_layer = fmt::layer().json().with_current_span(true).with_span_list(true);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// In-process counters of scan decisions, keyed by [`dlp_core::Action`].
/// Not a substitute for the audit trail — a coarse, cheap-to-read signal
/// for `/health` and operational dashboards.
#[derive(Clone, Default)]
pub struct DecisionCounters {
    counts: Arc<RwLock<HashMap<&'static str, Arc<AtomicU64>>>>,
}

impl DecisionCounters {
    /// A fresh, zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `action`.
    pub fn record(&self, action: dlp_core::Action) {
        let key = action_key(action);
        let counter = {
            let read = self.counts.read().unwrap();
            read.get(key).cloned()
        };
        let counter = counter.unwrap_or_else(|| {
            let mut write = self.counts.write().unwrap();
            write.entry(key).or_insert_with(|| Arc::new(AtomicU64::new(0))).clone()
        });
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for `action`.
    pub fn get(&self, action: dlp_core::Action) -> u64 {
        let key = action_key(action);
        self.counts.read().unwrap().get(key).map_or(0, |c| c.load(Ordering::Relaxed))
    }
}

fn action_key(action: dlp_core::Action) -> &'static str {
    match action {
        dlp_core::Action::Allow => "allow",
        dlp_core::Action::Block => "block",
        dlp_core::Action::Redact => "redact",
        dlp_core::Action::Prompt => "prompt",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlp_core::Action;

    #[test]
    fn records_and_reads_back_per_action() {
        let counters = DecisionCounters::new();
        counters.record(Action::Block);
        counters.record(Action::Block);
        counters.record(Action::Allow);
        assert_eq!(counters.get(Action::Block), 2);
        assert_eq!(counters.get(Action::Allow), 1);
        assert_eq!(counters.get(Action::Redact), 0);
    }
}
