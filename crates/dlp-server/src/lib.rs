//! Daemon wiring: environment-sourced settings, the HTTP router, and the
//! first-run policy seed. Split out of `main.rs` so integration tests can
//! build the same [`axum::Router`] the binary serves without spawning a
//! subprocess.

#![deny(unsafe_code)]

pub mod routes;
pub mod settings;

use std::path::Path;
use std::sync::Arc;

use dlp_audit::{AuditRepository, SqlxAuditRepository};
use dlp_policy::PolicyConfig;
use dlp_service::{Orchestrator, ServiceContainer, ServiceError};
use routes::AppState;
pub use settings::Settings;

const DEFAULT_POLICY_YAML: &str = include_str!("../default_policy.yaml");

/// Write the bundled default policy to `path` if nothing is there yet.
pub fn seed_default_policy(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, DEFAULT_POLICY_YAML)
}

/// Errors raised while assembling the application from [`Settings`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to seed or load policy: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Policy(#[from] dlp_policy::PolicyError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("failed to open audit database: {0}")]
    Audit(#[from] dlp_audit::AuditError),
}

/// Seed the default policy (if absent), load it, open the audit database,
/// and build the `/api/v1` router.
pub async fn build_app(settings: &Settings) -> Result<axum::Router, BuildError> {
    seed_default_policy(&settings.policy_path)?;
    let policy = PolicyConfig::load_from_path(&settings.policy_path)?;

    let audit: Arc<dyn AuditRepository> = Arc::new(SqlxAuditRepository::connect(&settings.database_url).await?);
    let container = Arc::new(ServiceContainer::new(policy, audit)?);
    let orchestrator = Arc::new(Orchestrator::new(container.clone()));

    let state = Arc::new(AppState { orchestrator, container, policy_path: settings.policy_path.clone() });
    Ok(routes::router(state))
}
