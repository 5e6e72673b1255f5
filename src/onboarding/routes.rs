//! REST endpoints that host onboarding sessions for the browser front-end.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::manager::OnboardingSequencer;
use super::model::{StepPayload, ValidationErrors};
use super::step::OnboardingStep;
use crate::api::{DocumentTypeId, DocumentUpload, HrApi};
use crate::error::{ApiError, SubmitError};

/// Sessions untouched for this long are dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Largest document body accepted by the upload route.
pub const MAX_DOCUMENT_BYTES: usize = 25 * 1024 * 1024;

struct HostedSession {
    sequencer: Arc<OnboardingSequencer>,
    last_touched: Instant,
}

/// Open onboarding sessions, one per wizard in progress.
///
/// An operator who navigates away never says goodbye, so sessions idle for
/// longer than the TTL are evicted: lazily on lookup, on every insert, and
/// by [`SessionRegistry::spawn_reaper`].
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, HostedSession>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn insert(&self, sequencer: OnboardingSequencer) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let evicted = evict_expired(&mut sessions, self.ttl, now);
        if evicted > 0 {
            debug!(evicted, "Evicted idle onboarding sessions");
        }
        sessions.insert(
            id,
            HostedSession {
                sequencer: Arc::new(sequencer),
                last_touched: now,
            },
        );
        id
    }

    /// Look up a live session and mark it as used.
    pub async fn get(&self, id: Uuid) -> Option<Arc<OnboardingSequencer>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        if now.duration_since(entry.last_touched) > self.ttl {
            sessions.remove(&id);
            info!(session_id = %id, "Onboarding session expired");
            return None;
        }
        entry.last_touched = now;
        Some(Arc::clone(&entry.sequencer))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session idle for longer than the TTL. Returns how many.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, self.ttl, Instant::now())
    }

    /// Evict idle sessions on a fixed interval for the life of the process.
    pub fn spawn_reaper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle().await;
                if evicted > 0 {
                    info!(evicted, "Evicted idle onboarding sessions");
                }
            }
        })
    }
}

fn evict_expired(sessions: &mut HashMap<Uuid, HostedSession>, ttl: Duration, now: Instant) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| now.duration_since(s.last_touched) <= ttl);
    before - sessions.len()
}

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub api: Arc<dyn HrApi>,
    pub sessions: Arc<SessionRegistry>,
}

impl OnboardingRouteState {
    pub fn new(api: Arc<dyn HrApi>) -> Self {
        Self::with_session_ttl(api, DEFAULT_SESSION_TTL)
    }

    pub fn with_session_ttl(api: Arc<dyn HrApi>, ttl: Duration) -> Self {
        Self {
            api,
            sessions: Arc::new(SessionRegistry::with_ttl(ttl)),
        }
    }
}

/// Everything a handler can answer with besides success.
#[derive(Debug)]
enum RouteError {
    SessionNotFound(Uuid),
    UnknownStep(String),
    StepLocked(OnboardingStep),
    InvalidBody(OnboardingStep, ValidationErrors),
    Api(ApiError),
    Submit(SubmitError),
}

impl From<SubmitError> for RouteError {
    fn from(e: SubmitError) -> Self {
        Self::Submit(e)
    }
}

fn submit_status(e: &SubmitError) -> StatusCode {
    match e {
        SubmitError::Validation { .. }
        | SubmitError::InvalidUpload { .. }
        | SubmitError::MissingDocuments { .. }
        | SubmitError::UnknownDocumentType { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitError::MissingCorrelation { .. }
        | SubmitError::StepLocked { .. }
        | SubmitError::InFlight { .. } => StatusCode::CONFLICT,
        SubmitError::Finished => StatusCode::GONE,
        SubmitError::Remote(ApiError::Rejected { status, .. }) if (400..500).contains(status) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SubmitError::Remote(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("No onboarding session {id}"), "kind": "not_found" }),
            ),
            Self::UnknownStep(raw) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("Unknown onboarding step {raw}"), "kind": "not_found" }),
            ),
            Self::StepLocked(step) => (
                StatusCode::CONFLICT,
                json!({ "error": format!("Step {step} is not reachable yet"), "kind": "step_locked" }),
            ),
            Self::InvalidBody(step, errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": format!("Step {step} has validation errors: {errors}"),
                    "kind": "validation",
                    "errors": errors,
                }),
            ),
            Self::Api(e) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": e.user_message(), "kind": "remote" }),
            ),
            Self::Submit(e) => {
                let status = submit_status(&e);
                let mut body = json!({ "error": e.user_message(), "kind": e.kind() });
                if let SubmitError::Validation { ref errors, .. } = e {
                    body["errors"] = json!(errors);
                }
                (status, body)
            }
        };
        (status, Json(body)).into_response()
    }
}

fn parse_step(raw: &str) -> Result<OnboardingStep, RouteError> {
    OnboardingStep::parse(raw).ok_or_else(|| RouteError::UnknownStep(raw.to_string()))
}

async fn session(
    state: &OnboardingRouteState,
    id: Uuid,
) -> Result<Arc<OnboardingSequencer>, RouteError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or(RouteError::SessionNotFound(id))
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// POST /api/onboarding/sessions
///
/// Loads the document-type catalog and opens a fresh session at step 1.
async fn create_session(
    State(state): State<OnboardingRouteState>,
) -> Result<impl IntoResponse, RouteError> {
    let sequencer = OnboardingSequencer::start(Arc::clone(&state.api))
        .await
        .map_err(RouteError::Api)?;
    let status = sequencer.status().await;
    let id = state.sessions.insert(sequencer).await;
    info!(session_id = %id, "Onboarding session started");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "session_id": id, "status": status })),
    ))
}

/// GET /api/onboarding/sessions/{id}
async fn get_status(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RouteError> {
    let sequencer = session(&state, id).await?;
    Ok(Json(sequencer.status().await))
}

/// DELETE /api/onboarding/sessions/{id}
///
/// The operator left the wizard; the session is discarded.
async fn abandon_session(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RouteError> {
    if !state.sessions.remove(id).await {
        return Err(RouteError::SessionNotFound(id));
    }
    info!(session_id = %id, "Onboarding session abandoned");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/onboarding/sessions/{id}/steps/{step}
///
/// The form contents for a step: last submitted payload or blanks.
async fn get_step(
    State(state): State<OnboardingRouteState>,
    Path((id, raw_step)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, RouteError> {
    let step = parse_step(&raw_step)?;
    let sequencer = session(&state, id).await?;
    let prefill = sequencer.prefill(step).await.map(|p| p.data());
    Ok(Json(json!({ "step": step, "prefill": prefill })))
}

/// POST /api/onboarding/sessions/{id}/steps/{step}
async fn submit_step(
    State(state): State<OnboardingRouteState>,
    Path((id, raw_step)): Path<(Uuid, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, RouteError> {
    let step = parse_step(&raw_step)?;
    let sequencer = session(&state, id).await?;
    sequencer.ensure_reachable(step).await?;
    let payload =
        StepPayload::from_json(step, body).map_err(|errors| RouteError::InvalidBody(step, errors))?;
    let status = sequencer.submit_step(payload).await?;
    Ok(Json(status))
}

/// POST /api/onboarding/sessions/{id}/navigate/{step}
async fn navigate(
    State(state): State<OnboardingRouteState>,
    Path((id, raw_step)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, RouteError> {
    let step = parse_step(&raw_step)?;
    let sequencer = session(&state, id).await?;
    let view = sequencer
        .go_to_step(step)
        .await
        .ok_or(RouteError::StepLocked(step))?;
    Ok(Json(json!({
        "step": view.step,
        "prefill": view.prefill.map(|p| p.data()),
    })))
}

/// POST /api/onboarding/sessions/{id}/documents/{document_type_id}
///
/// Raw file body up to [`MAX_DOCUMENT_BYTES`]; the name comes from
/// `x-file-name`.
async fn upload_document(
    State(state): State<OnboardingRouteState>,
    Path((id, document_type_id)): Path<(Uuid, DocumentTypeId)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, RouteError> {
    let sequencer = session(&state, id).await?;
    let file_name = headers
        .get("x-file-name")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("document")
        .to_string();
    let mut upload = DocumentUpload::new(file_name, body.to_vec());
    if let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        upload = upload.with_content_type(content_type);
    }
    let file_id = sequencer.upload_document(document_type_id, upload).await?;
    Ok(Json(json!({
        "document_type_id": document_type_id,
        "file_id": file_id,
    })))
}

/// POST /api/onboarding/sessions/{id}/complete
///
/// On success the session is finished and discarded.
async fn complete(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RouteError> {
    let sequencer = session(&state, id).await?;
    match sequencer.complete_onboarding().await {
        Ok(status) => {
            state.sessions.remove(id).await;
            info!(session_id = %id, "Onboarding session completed and closed");
            Ok(Json(status))
        }
        Err(e) => {
            warn!(session_id = %id, error = %e, "Onboarding completion refused");
            Err(e.into())
        }
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/onboarding/sessions", post(create_session))
        .route(
            "/api/onboarding/sessions/{id}",
            get(get_status).delete(abandon_session),
        )
        .route(
            "/api/onboarding/sessions/{id}/steps/{step}",
            get(get_step).post(submit_step),
        )
        .route("/api/onboarding/sessions/{id}/navigate/{step}", post(navigate))
        .route(
            "/api/onboarding/sessions/{id}/documents/{document_type_id}",
            post(upload_document).layer(DefaultBodyLimit::max(MAX_DOCUMENT_BYTES)),
        )
        .route("/api/onboarding/sessions/{id}/complete", post(complete))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::onboarding::manager::stub::{StubApi, catalog};
    use crate::onboarding::model::fixtures;

    fn app() -> (Arc<StubApi>, OnboardingRouteState, Router) {
        let api = Arc::new(StubApi::with_catalog(catalog()));
        let state = OnboardingRouteState::new(api.clone());
        let router = onboarding_routes(state.clone());
        (api, state, router)
    }

    async fn call(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn new_session(router: &Router) -> String {
        let req = Request::post("/api/onboarding/sessions")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(router, req).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_session_returns_fresh_status() {
        let (_api, state, router) = app();
        let req = Request::post("/api/onboarding/sessions")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&router, req).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"]["current_step"], "personal");
        assert_eq!(body["status"]["progress"][0]["state"], "current");
        assert_eq!(body["status"]["document_types"].as_array().unwrap().len(), 3);
        assert_eq!(state.sessions.len().await, 1);
    }

    #[tokio::test]
    async fn submit_step_by_number_advances() {
        let (_api, _state, router) = app();
        let id = new_session(&router).await;

        let body = serde_json::to_value(fixtures::personal("Asha")).unwrap();
        let (status, json) = call(
            &router,
            post_json(&format!("/api/onboarding/sessions/{id}/steps/1"), &body),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["current_step"], "job_details");
        assert_eq!(json["employee_id"], "emp-1001");
    }

    #[tokio::test]
    async fn validation_errors_are_unprocessable() {
        let (api, _state, router) = app();
        let id = new_session(&router).await;

        let mut personal = fixtures::personal("Asha");
        personal.employee_code = String::new();
        let body = serde_json::to_value(personal).unwrap();
        let (status, json) = call(
            &router,
            post_json(&format!("/api/onboarding/sessions/{id}/steps/personal"), &body),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["kind"], "validation");
        assert_eq!(json["errors"][0]["field"], "employee_code");
        assert_eq!(api.calls(), vec!["document_types"]);
    }

    #[tokio::test]
    async fn locked_step_conflicts() {
        let (_api, _state, router) = app();
        let id = new_session(&router).await;

        let req = Request::post(format!("/api/onboarding/sessions/{id}/navigate/bank"))
            .body(Body::empty())
            .unwrap();
        let (status, json) = call(&router, req).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["kind"], "step_locked");

        let body = serde_json::to_value(fixtures::bank()).unwrap();
        let (status, json) = call(
            &router,
            post_json(&format!("/api/onboarding/sessions/{id}/steps/bank"), &body),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["kind"], "step_locked");
    }

    #[tokio::test]
    async fn backend_rejection_surfaces_message() {
        let (api, _state, router) = app();
        let id = new_session(&router).await;
        api.fail("personal_info");

        let body = serde_json::to_value(fixtures::personal("Asha")).unwrap();
        let (status, json) = call(
            &router,
            post_json(&format!("/api/onboarding/sessions/{id}/steps/1"), &body),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "personal_info rejected");
        assert_eq!(json["kind"], "remote");
    }

    #[tokio::test]
    async fn unknown_session_and_step_are_not_found() {
        let (_api, _state, router) = app();
        let missing = Uuid::new_v4();
        let req = Request::get(format!("/api/onboarding/sessions/{missing}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(&router, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let id = new_session(&router).await;
        let req = Request::get(format!("/api/onboarding/sessions/{id}/steps/payroll"))
            .body(Body::empty())
            .unwrap();
        let (status, json) = call(&router, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("payroll"));
    }

    #[tokio::test]
    async fn abandon_discards_session() {
        let (_api, state, router) = app();
        let id = new_session(&router).await;

        let req = Request::delete(format!("/api/onboarding/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(&router, req).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn full_wizard_closes_session_on_completion() {
        let (api, state, router) = app();
        let id = new_session(&router).await;

        let forms = [
            ("personal", serde_json::to_value(fixtures::personal("Asha")).unwrap()),
            ("job_details", serde_json::to_value(fixtures::job()).unwrap()),
            ("contact", serde_json::to_value(fixtures::contact()).unwrap()),
            ("bank", serde_json::to_value(fixtures::bank()).unwrap()),
        ];
        for (step, body) in &forms {
            let (status, _) = call(
                &router,
                post_json(&format!("/api/onboarding/sessions/{id}/steps/{step}"), body),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "step {step}");
        }

        // Completion is blocked until mandatory documents are uploaded.
        let req = Request::post(format!("/api/onboarding/sessions/{id}/complete"))
            .body(Body::empty())
            .unwrap();
        let (status, json) = call(&router, req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["kind"], "missing_documents");

        for (type_id, name) in [(1, "aadhaar.pdf"), (2, "pan.pdf")] {
            let req = Request::post(format!("/api/onboarding/sessions/{id}/documents/{type_id}"))
                .header("x-file-name", name)
                .header(header::CONTENT_TYPE, "application/pdf")
                .body(Body::from("scan"))
                .unwrap();
            let (status, json) = call(&router, req).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["file_id"], format!("file-{type_id}-{name}"));
        }

        let req = Request::post(format!("/api/onboarding/sessions/{id}/complete"))
            .body(Body::empty())
            .unwrap();
        let (status, json) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["finished"], true);
        assert_eq!(state.sessions.len().await, 0);
        assert_eq!(api.calls().last().unwrap(), "complete");
    }

    async fn through_bank(router: &Router, id: &str) {
        let forms = [
            ("personal", serde_json::to_value(fixtures::personal("Asha")).unwrap()),
            ("job_details", serde_json::to_value(fixtures::job()).unwrap()),
            ("contact", serde_json::to_value(fixtures::contact()).unwrap()),
            ("bank", serde_json::to_value(fixtures::bank()).unwrap()),
        ];
        for (step, body) in &forms {
            let (status, _) = call(
                router,
                post_json(&format!("/api/onboarding/sessions/{id}/steps/{step}"), body),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "step {step}");
        }
    }

    fn upload_req(id: &str, type_id: i64, content_type: &str, body: Vec<u8>) -> Request<Body> {
        Request::post(format!("/api/onboarding/sessions/{id}/documents/{type_id}"))
            .header("x-file-name", "scan.pdf")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_body_for_locked_step_conflicts() {
        let (api, _state, router) = app();
        let id = new_session(&router).await;

        let (status, json) = call(
            &router,
            post_json(
                &format!("/api/onboarding/sessions/{id}/steps/bank"),
                &json!("not a form"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["kind"], "step_locked");
        assert_eq!(api.calls(), vec!["document_types"]);
    }

    #[tokio::test]
    async fn idle_session_expires() {
        let api = Arc::new(StubApi::with_catalog(catalog()));
        let state = OnboardingRouteState::with_session_ttl(api, Duration::from_millis(50));
        let router = onboarding_routes(state.clone());
        let id = new_session(&router).await;

        let req = Request::get(format!("/api/onboarding/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(120)).await;
        let req = Request::get(format!("/api/onboarding/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, json) = call(&router, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["kind"], "not_found");
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn reaper_and_insert_evict_idle_sessions() {
        let api: Arc<dyn HrApi> = Arc::new(StubApi::with_catalog(catalog()));
        let registry = Arc::new(SessionRegistry::with_ttl(Duration::from_millis(50)));
        registry
            .insert(OnboardingSequencer::new(Arc::clone(&api), catalog()))
            .await;
        registry
            .insert(OnboardingSequencer::new(Arc::clone(&api), catalog()))
            .await;
        assert_eq!(registry.evict_idle().await, 0);

        tokio::time::sleep(Duration::from_millis(120)).await;
        let fresh = registry
            .insert(OnboardingSequencer::new(Arc::clone(&api), catalog()))
            .await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.get(fresh).await.is_some());

        let reaper = Arc::clone(&registry).spawn_reaper(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(registry.len().await, 0);
        reaper.abort();
    }

    #[tokio::test]
    async fn large_documents_are_accepted() {
        let (_api, _state, router) = app();
        let id = new_session(&router).await;
        through_bank(&router, &id).await;

        let scan = vec![b'%'; 5 * 1024 * 1024];
        let (status, json) = call(&router, upload_req(&id, 1, "application/pdf", scan)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["file_id"], "file-1-scan.pdf");
    }

    #[tokio::test]
    async fn bad_content_type_is_unprocessable() {
        let (_api, _state, router) = app();
        let id = new_session(&router).await;
        through_bank(&router, &id).await;

        let (status, _) = call(&router, upload_req(&id, 1, "application/pdf", b"scan".to_vec())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = call(&router, upload_req(&id, 1, "pdf", b"scan".to_vec())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["kind"], "invalid_upload");

        let req = Request::get(format!("/api/onboarding/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (_, json) = call(&router, req).await;
        assert_eq!(json["documents"]["documents"]["1"], "file-1-scan.pdf");
    }

    #[tokio::test]
    async fn navigate_back_returns_prefill() {
        let (_api, _state, router) = app();
        let id = new_session(&router).await;
        let body = serde_json::to_value(fixtures::personal("Asha")).unwrap();
        call(
            &router,
            post_json(&format!("/api/onboarding/sessions/{id}/steps/1"), &body),
        )
        .await;

        let req = Request::post(format!("/api/onboarding/sessions/{id}/navigate/1"))
            .body(Body::empty())
            .unwrap();
        let (status, json) = call(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["step"], "personal");
        assert_eq!(json["prefill"]["first_name"], "Asha");
    }
}
