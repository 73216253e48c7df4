//! HTTP handlers for the scan, audit, and dashboard surface.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use dlp_audit::{AuditRepository, EventQuery};
use dlp_core::{Action, ScannerType};
use dlp_policy::PolicyConfig;
use dlp_service::{Orchestrator, ScanRequest, ServiceContainer, ServiceError};

/// Shared state reachable from every handler.
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub container: Arc<ServiceContainer>,
    pub policy_path: PathBuf,
}

/// Build the `/api/v1` router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/scan", post(scan))
        .route("/api/v1/audit", get(list_audit))
        .route("/api/v1/audit/:id", get(get_audit))
        .route("/api/v1/health", get(health))
        .route("/api/v1/policy", put(put_policy))
        .route("/api/v1/policy/reload", post(reload_policy))
        .route("/api/v1/dashboard/stats", get(dashboard_stats))
        .route("/api/v1/dashboard/policy", get(dashboard_policy))
        .route("/api/v1/dashboard/patterns", get(dashboard_patterns))
        .with_state(state)
}

/// A structured error mapped onto the transport status codes described in
/// the error handling design: validation errors are 4xx, I/O and audit
/// failures are 5xx.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::Policy(_) | ServiceError::CustomPattern(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Audit(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, message: err.to_string() }
    }
}

impl From<dlp_audit::AuditError> for ApiError {
    fn from(err: dlp_audit::AuditError) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: err.to_string() }
    }
}

impl From<dlp_policy::PolicyError> for ApiError {
    fn from(err: dlp_policy::PolicyError) -> Self {
        Self { status: StatusCode::UNPROCESSABLE_ENTITY, message: err.to_string() }
    }
}

fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError { status: StatusCode::BAD_REQUEST, message: message.into() }
}

#[derive(Debug, Deserialize)]
struct ScanBody {
    content: String,
    destination: Option<String>,
    agent_id: Option<String>,
    tool_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct FindingResponseBody {
    scanner_type: &'static str,
    finding_type: String,
    severity: dlp_core::Severity,
    start: usize,
    end: usize,
    redacted_snippet: String,
}

#[derive(Debug, Serialize)]
struct ScanResponseBody {
    action: Action,
    content: Option<String>,
    findings: Vec<FindingResponseBody>,
    findings_count: usize,
    scan_id: i64,
    duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_action: Option<Action>,
}

async fn scan(State(state): State<Arc<AppState>>, Json(body): Json<ScanBody>) -> Result<Json<ScanResponseBody>, ApiError> {
    let response = state
        .orchestrator
        .scan(ScanRequest {
            content: body.content,
            destination: body.destination,
            agent_id: body.agent_id,
            tool_name: body.tool_name,
        })
        .await?;

    Ok(Json(ScanResponseBody {
        action: response.action,
        content: response.content,
        findings: response
            .findings
            .into_iter()
            .map(|f| FindingResponseBody {
                scanner_type: f.scanner_type.as_str(),
                finding_type: f.finding_type,
                severity: f.severity,
                start: f.start,
                end: f.end,
                redacted_snippet: f.redacted_snippet,
            })
            .collect(),
        findings_count: response.findings_count,
        scan_id: response.scan_id,
        duration_ms: response.duration_ms,
        suggested_action: response.suggested_action,
    }))
}

#[derive(Debug, Deserialize)]
struct AuditListParams {
    #[serde(default)]
    agent_id: Option<String>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    offset: Option<i64>,
}

async fn list_audit(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditListParams>,
) -> Result<Json<Vec<dlp_audit::ScanEvent>>, ApiError> {
    let limit = params.limit.unwrap_or(50);
    let offset = params.offset.unwrap_or(0);
    if !(1..=500).contains(&limit) {
        return Err(bad_request("limit must be between 1 and 500"));
    }
    if offset < 0 {
        return Err(bad_request("offset must be non-negative"));
    }
    let events = state
        .orchestrator
        .query_audit(EventQuery { agent_id: params.agent_id, destination: params.destination, action: params.action, limit, offset })
        .await?;
    Ok(Json(events))
}

async fn get_audit(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Response, ApiError> {
    match state.container.audit().get_event(id).await? {
        Some(event) => Ok(Json(event).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    scanners: Vec<&'static str>,
    policy_loaded: bool,
    default_action: Action,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let policy = state.container.current_policy();
    Json(HealthResponse {
        status: "ok",
        version: dlp_core::VERSION,
        scanners: vec![ScannerType::Secret.as_str(), ScannerType::Pii.as_str(), ScannerType::Custom.as_str()],
        policy_loaded: true,
        default_action: policy.default_action,
    })
}

async fn put_policy(State(state): State<Arc<AppState>>, Json(config): Json<PolicyConfig>) -> Result<Json<PolicyConfig>, ApiError> {
    state.container.reload_policy(config.clone())?;
    config.save_to_path(&state.policy_path).map_err(|err| {
        warn!(error = %err, "failed to persist policy after successful reload");
        ApiError::from(err)
    })?;
    Ok(Json(config))
}

#[derive(Debug, Serialize)]
struct ReloadResponse {
    status: &'static str,
    default_action: Action,
    custom_patterns_count: usize,
}

async fn reload_policy(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>, ApiError> {
    let config = PolicyConfig::load_from_path(&state.policy_path)?;
    let custom_patterns_count = config.custom_patterns.len();
    let default_action = config.default_action;
    state.container.reload_policy(config)?;
    Ok(Json(ReloadResponse { status: "reloaded", default_action, custom_patterns_count }))
}

async fn dashboard_stats(State(state): State<Arc<AppState>>) -> Result<Json<dlp_audit::DashboardStats>, ApiError> {
    Ok(Json(state.container.audit().get_stats().await?))
}

async fn dashboard_policy(State(state): State<Arc<AppState>>) -> Json<PolicyConfig> {
    Json(state.container.current_policy())
}

#[derive(Debug, Serialize)]
struct PatternEntry {
    name: String,
    severity: dlp_core::Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_severity: Option<dlp_core::Severity>,
    category: String,
    description: &'static str,
    regex: String,
}

#[derive(Debug, Serialize)]
struct PatternCatalog {
    secrets: Vec<PatternEntry>,
    pii: Vec<PatternEntry>,
    custom: Vec<PatternEntry>,
}

async fn dashboard_patterns(State(state): State<Arc<AppState>>) -> Json<PatternCatalog> {
    let policy = state.container.current_policy();

    let secrets = dlp_patterns::secret_patterns()
        .iter()
        .map(|p| {
            let overridden = policy.pattern_severity_overrides.get(p.name).copied();
            PatternEntry {
                name: p.name.to_string(),
                severity: overridden.unwrap_or(p.severity),
                default_severity: overridden.filter(|s| *s != p.severity),
                category: dlp_patterns::category_label(p.category).to_string(),
                description: p.description,
                regex: p.regex.as_str().to_string(),
            }
        })
        .collect();

    let pii = dlp_patterns::pii_patterns()
        .iter()
        .map(|p| {
            let overridden = policy.pattern_severity_overrides.get(p.name).copied();
            PatternEntry {
                name: p.name.to_string(),
                severity: overridden.unwrap_or(p.severity),
                default_severity: overridden.filter(|s| *s != p.severity),
                category: "PII".to_string(),
                description: p.description,
                regex: p.regex.as_str().to_string(),
            }
        })
        .collect();

    let custom = policy
        .custom_patterns
        .iter()
        .map(|p| PatternEntry {
            name: p.name.clone(),
            severity: p.severity.as_deref().and_then(parse_display_severity).unwrap_or(dlp_core::Severity::Medium),
            default_severity: None,
            category: "Custom".to_string(),
            description: "",
            regex: p.regex.clone(),
        })
        .collect();

    Json(PatternCatalog { secrets, pii, custom })
}

fn parse_display_severity(raw: &str) -> Option<dlp_core::Severity> {
    match raw.to_ascii_uppercase().as_str() {
        "LOW" => Some(dlp_core::Severity::Low),
        "MEDIUM" => Some(dlp_core::Severity::Medium),
        "HIGH" => Some(dlp_core::Severity::High),
        "CRITICAL" => Some(dlp_core::Severity::Critical),
        _ => None,
    }
}
