use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use advisor_agent::{AdvisorRuntime, Conversation, ConversationEntry};
use advisor_core::config::ServerConfig;
use advisor_core::{ApplicationError, CaseAnalysis, InterfaceError, QuickFacts, ResponsePayload};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Longest question accepted over HTTP, in characters.
pub const MAX_QUESTION_CHARS: usize = 4_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_sessions: usize,
    pub idle_timeout: Duration,
}

impl SessionLimits {
    pub fn from_config(server: &ServerConfig) -> Self {
        Self {
            max_sessions: server.max_sessions,
            idle_timeout: Duration::from_secs(server.session_idle_secs),
        }
    }
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self { max_sessions: 1_000, idle_timeout: Duration::from_secs(1_800) }
    }
}

struct Session {
    conversation: Conversation,
    last_seen: Instant,
}

impl Session {
    fn new(now: Instant) -> Self {
        Self { conversation: Conversation::new(), last_seen: now }
    }

    fn touch(&mut self) -> &mut Conversation {
        self.last_seen = Instant::now();
        &mut self.conversation
    }

    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= idle_timeout
    }
}

/// Shared by every request. The runtime is read-only; each session owns its own
/// conversation inside the map.
#[derive(Clone, Default)]
pub struct ApiState {
    runtime: Arc<AdvisorRuntime>,
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    limits: SessionLimits,
}

impl ApiState {
    pub fn new(runtime: AdvisorRuntime) -> Self {
        Self {
            runtime: Arc::new(runtime),
            sessions: Arc::default(),
            limits: SessionLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn analysis(&self) -> &CaseAnalysis {
        self.runtime.router().analysis()
    }
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionMessages {
    pub session_id: Uuid,
    pub messages: Vec<ConversationEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ApiErrorBody {
            error: self.0.user_message().to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/facts", get(facts))
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/{session_id}/ask", post(ask))
        .route("/api/v1/sessions/{session_id}/messages", get(messages))
        .with_state(state)
}

async fn facts(State(state): State<ApiState>) -> Json<QuickFacts> {
    Json(QuickFacts::from_analysis(state.analysis()))
}

/// Idle sessions are evicted first; the cap applies to what remains.
async fn create_session(
    State(state): State<ApiState>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let now = Instant::now();
    let mut sessions = state.sessions.lock().await;

    let before = sessions.len();
    sessions.retain(|_, session| !session.is_idle(now, state.limits.idle_timeout));
    let evicted = before - sessions.len();
    if evicted > 0 {
        info!(
            event_name = "advisor.session.evicted",
            evicted,
            remaining = sessions.len(),
            "idle conversation sessions evicted"
        );
    }

    if sessions.len() >= state.limits.max_sessions {
        let error = ApplicationError::SessionLimitReached(state.limits.max_sessions);
        return Err(reject(error, &correlation_id));
    }

    let session_id = Uuid::new_v4();
    sessions.insert(session_id, Session::new(now));

    info!(
        event_name = "advisor.session.created",
        session_id = %session_id,
        open_sessions = sessions.len(),
        "conversation session created"
    );
    Ok((StatusCode::CREATED, Json(SessionCreated { session_id })))
}

async fn ask(
    Path(session_id): Path<String>,
    State(state): State<ApiState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<ResponsePayload>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    if request.question.chars().count() > MAX_QUESTION_CHARS {
        let error = ApplicationError::InvalidQuestion(format!(
            "question longer than {MAX_QUESTION_CHARS} characters"
        ));
        return Err(reject(error, &correlation_id));
    }

    let session_key =
        parse_session_id(&session_id).map_err(|error| reject(error, &correlation_id))?;
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&session_key)
        .ok_or_else(|| reject(ApplicationError::SessionNotFound(session_id), &correlation_id))?;

    let payload = state.runtime.handle_turn(session.touch(), &request.question);
    Ok(Json(payload))
}

async fn messages(
    Path(session_id): Path<String>,
    State(state): State<ApiState>,
) -> Result<Json<SessionMessages>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let session_key =
        parse_session_id(&session_id).map_err(|error| reject(error, &correlation_id))?;

    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&session_key)
        .ok_or_else(|| reject(ApplicationError::SessionNotFound(session_id), &correlation_id))?;

    Ok(Json(SessionMessages {
        session_id: session_key,
        messages: session.touch().entries().to_vec(),
    }))
}

/// A malformed id can never name a session, so it is reported as not found.
fn parse_session_id(raw: &str) -> Result<Uuid, ApplicationError> {
    Uuid::parse_str(raw).map_err(|_| ApplicationError::SessionNotFound(raw.to_string()))
}

fn reject(error: ApplicationError, correlation_id: &str) -> ApiError {
    warn!(
        event_name = "advisor.api.request_rejected",
        correlation_id = %correlation_id,
        error = %error,
        "api request rejected"
    );
    ApiError(error.into_interface(correlation_id))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use advisor_core::Topic;
    use axum::body::{to_bytes, Body};
    use axum::extract::{Path, State};
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use axum::Json;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::{
        ask, create_session, messages, router, ApiState, AskRequest, SessionLimits,
        MAX_QUESTION_CHARS,
    };

    async fn session(state: &ApiState) -> Uuid {
        let (status, Json(created)) =
            create_session(State(state.clone())).await.expect("session should be created");
        assert_eq!(status, StatusCode::CREATED);
        created.session_id
    }

    fn limited(max_sessions: usize, idle_timeout: Duration) -> ApiState {
        ApiState::default().with_limits(SessionLimits { max_sessions, idle_timeout })
    }

    fn question(text: &str) -> Json<AskRequest> {
        Json(AskRequest { question: text.to_string() })
    }

    #[tokio::test]
    async fn ask_answers_and_records_turn() {
        let state = ApiState::default();
        let session_id = session(&state).await;

        let Json(payload) = ask(
            Path(session_id.to_string()),
            State(state.clone()),
            question("What are the risks?"),
        )
        .await
        .expect("ask should succeed");
        assert_eq!(payload.topic, Topic::Risks);

        let Json(history) = messages(Path(session_id.to_string()), State(state))
            .await
            .expect("messages should load");
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.messages[0].content, "What are the risks?");
        assert_eq!(history.messages[1].content, payload.text);
    }

    #[tokio::test]
    async fn sessions_do_not_share_conversations() {
        let state = ApiState::default();
        let first = session(&state).await;
        let second = session(&state).await;

        ask(Path(first.to_string()), State(state.clone()), question("hello"))
            .await
            .expect("ask should succeed");

        let Json(first_history) =
            messages(Path(first.to_string()), State(state.clone())).await.expect("first");
        let Json(second_history) =
            messages(Path(second.to_string()), State(state)).await.expect("second");
        assert_eq!(first_history.messages.len(), 2);
        assert!(second_history.messages.is_empty());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let state = ApiState::default();

        let result =
            ask(Path(Uuid::new_v4().to_string()), State(state.clone()), question("hi")).await;
        let response = result.expect_err("unknown session should fail").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let result = messages(Path("not-a-uuid".to_string()), State(state)).await;
        let response = result.expect_err("malformed id should fail").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oversized_question_is_bad_request() {
        let state = ApiState::default();
        let session_id = session(&state).await;

        let result = ask(
            Path(session_id.to_string()),
            State(state.clone()),
            question(&"a".repeat(MAX_QUESTION_CHARS + 1)),
        )
        .await;
        let response = result.expect_err("oversized question should fail").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let Json(history) =
            messages(Path(session_id.to_string()), State(state)).await.expect("messages");
        assert!(history.messages.is_empty());
    }

    #[tokio::test]
    async fn session_cap_rejects_new_sessions() {
        let state = limited(2, Duration::from_secs(3_600));
        let first = session(&state).await;
        session(&state).await;

        let response = create_session(State(state.clone()))
            .await
            .expect_err("third session should be refused")
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let error = body_json(response.into_body()).await;
        assert_eq!(error["error"], "Too many conversations are open right now. Try again later.");

        let Json(history) =
            messages(Path(first.to_string()), State(state)).await.expect("first survives");
        assert!(history.messages.is_empty());
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_on_create() {
        let state = limited(1, Duration::ZERO);
        let stale = session(&state).await;
        ask(Path(stale.to_string()), State(state.clone()), question("hello"))
            .await
            .expect("ask should succeed");

        let fresh = session(&state).await;

        let result = messages(Path(stale.to_string()), State(state.clone())).await;
        let response = result.expect_err("idle session should be gone").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        messages(Path(fresh.to_string()), State(state)).await.expect("fresh session is open");
    }

    #[tokio::test]
    async fn http_flow_through_router() {
        let app = router(ApiState::default());

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/sessions").body(Body::empty()).expect("request builds"),
            )
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response.into_body()).await;
        let session_id = created["session_id"].as_str().expect("session id").to_string();

        let response = app
            .clone()
            .oneshot(
                Request::post(format!("/api/v1/sessions/{session_id}/ask"))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "question": "show me the numbers" }).to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response.into_body()).await;
        assert_eq!(payload["topic"], "key_numbers");
        assert_eq!(payload["attachment"]["kind"], "table");

        let response = app
            .oneshot(
                Request::get(format!("/api/v1/sessions/{}/messages", Uuid::new_v4()))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error = body_json(response.into_body()).await;
        assert_eq!(error["error"], "The requested conversation does not exist.");
        assert!(error["correlation_id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn facts_route_returns_quick_facts() {
        let response = router(ApiState::default())
            .oneshot(Request::get("/api/v1/facts").body(Body::empty()).expect("request builds"))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let facts = body_json(response.into_body()).await;
        assert_eq!(facts["facts"][3]["label"], "Break-even");
        assert_eq!(facts["facts"][3]["value"], "3.9 years");
    }

    async fn body_json(body: Body) -> Value {
        let bytes = to_bytes(body, usize::MAX).await.expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }
}
