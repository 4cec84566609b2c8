//! HTTP API over chat sessions and the analysis engine.
//!
//! | Route | Body | Result |
//! |---|---|---|
//! | `POST /api/chat` | `{message, session_id?}` | reply + sentiment, or final analysis on an exit command |
//! | `POST /api/end_conversation` | `{session_id}` | final analysis |
//! | `POST /api/reset` | `{session_id?}` | fresh session id |
//! | `POST /api/analyze` | `{observations: [...]}` | analysis of caller-supplied scores |
//! | `GET /health` | | `{"status": "ok"}` |

use crate::analysis::{ConversationSummary, SentimentObservation};
use crate::config::SentiscopeConfig;
use crate::emotion::Emotion;
use crate::error::{Result, SentiscopeError};
use crate::report::RenderedSummary;
use crate::sentiment::SentimentLabel;
use crate::session::{ChatServices, ChatSession};
use crate::text;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Live sessions keyed by id, plus the services that create them.
pub struct SessionRegistry {
    services: ChatServices,
    sessions: Mutex<HashMap<String, ChatSession>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Caller-supplied observation; the label is derived from the score when
/// omitted.
#[derive(Debug, Deserialize)]
pub struct ObservationInput {
    pub score: f64,
    #[serde(default)]
    pub label: Option<SentimentLabel>,
    #[serde(default)]
    pub emotion: Option<Emotion>,
    #[serde(default)]
    pub emotion_confidence: Option<f64>,
    /// Untimed observations leave the summary duration unknown.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub observations: Vec<ObservationInput>,
}

fn analysis_json(summary: Option<&ConversationSummary>) -> Result<Value> {
    match summary {
        Some(summary) => Ok(serde_json::to_value(RenderedSummary::new(summary))?),
        None => Ok(Value::Null),
    }
}

fn conversation_id_for(session_id: &str) -> String {
    let short: String = session_id.chars().take(8).collect();
    format!("web_{short}")
}

impl SessionRegistry {
    pub fn new(services: ChatServices) -> Self {
        Self {
            services,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Handle one chat message, creating the session on first use.
    ///
    /// # Errors
    ///
    /// Input and analysis errors from the session.
    pub async fn chat(&self, request: ChatRequest) -> Result<Value> {
        let session_id = request
            .session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        // Rejected input never creates a session.
        let message = text::clean_input(&request.message)?;

        let mut sessions = self.sessions.lock().await;
        let created = !sessions.contains_key(&session_id);
        let session = sessions.entry(session_id.clone()).or_insert_with(|| {
            info!(session = %session_id, "session created");
            self.services.start(Some(conversation_id_for(&session_id)))
        });

        let turn = match session.handle(&message) {
            Ok(turn) => turn,
            Err(err) => {
                if created {
                    sessions.remove(&session_id);
                }
                return Err(err);
            }
        };
        if turn.exit {
            let summary = session.summary();
            sessions.remove(&session_id);
            let summary = summary?;
            return Ok(json!({
                "type": "end_conversation",
                "message": turn.reply,
                "analysis": analysis_json(summary.as_ref())?,
                "session_id": session_id,
            }));
        }

        let sentiment = turn.sentiment.unwrap_or_else(crate::sentiment::SentimentScore::neutral);
        let emotion = turn
            .emotion
            .as_ref()
            .map_or(Emotion::Neutral, |reading| reading.primary);
        Ok(json!({
            "type": "message",
            "user_message": turn.input,
            "bot_message": turn.reply,
            "sentiment": {
                "label": sentiment.label,
                "score": sentiment.score,
                "confidence": sentiment.confidence,
                "adjusted_for_comparison": sentiment.adjusted_for_comparison,
                "emotion": emotion,
                "emotion_emoji": emotion.emoji(),
            },
            "timestamp": Utc::now().to_rfc3339(),
            "session_id": session_id,
        }))
    }

    /// End a session and return its analysis.
    ///
    /// # Errors
    ///
    /// [`SentiscopeError::Session`] when the id is unknown.
    pub async fn end(&self, session_id: Option<String>) -> Result<Value> {
        let Some(session_id) = session_id else {
            return Err(SentiscopeError::Session("No active conversation".to_owned()));
        };
        let Some(mut session) = self.sessions.lock().await.remove(&session_id) else {
            return Err(SentiscopeError::Session("No active conversation".to_owned()));
        };
        let summary = session.finish()?;
        info!(session = %session_id, "session ended");
        Ok(json!({
            "success": true,
            "analysis": analysis_json(summary.as_ref())?,
            "session_id": session_id,
        }))
    }

    /// Drop the given session (if any) and open a new one.
    pub async fn reset(&self, session_id: Option<String>) -> String {
        let mut sessions = self.sessions.lock().await;
        if let Some(old) = session_id {
            sessions.remove(&old);
        }
        let new_id = uuid::Uuid::new_v4().to_string();
        sessions.insert(
            new_id.clone(),
            self.services.start(Some(conversation_id_for(&new_id))),
        );
        new_id
    }

    /// Run the engine on caller-supplied observations.
    ///
    /// # Errors
    ///
    /// `InsufficientData` for an empty list, `InvalidScore` for out-of-range
    /// scores.
    pub fn analyze(&self, inputs: Vec<ObservationInput>) -> Result<Value> {
        let analyzer = self.services.analyzer();
        let thresholds = analyzer.config().thresholds;
        let observations = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| -> Result<SentimentObservation> {
                let observation = SentimentObservation::new(
                    index,
                    input.score,
                    input.label.unwrap_or_else(|| thresholds.classify(input.score)),
                    input.emotion.unwrap_or(Emotion::Neutral),
                    input.timestamp,
                )?;
                Ok(match input.emotion_confidence {
                    Some(confidence) => observation.with_emotion_confidence(confidence),
                    None => observation,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let summary = analyzer.analyze(&observations)?;
        analysis_json(Some(&summary))
    }
}

// ── HTTP layer ──────────────────────────────────────────────────────────

type AppState = Arc<SessionRegistry>;

fn status_for(err: &SentiscopeError) -> StatusCode {
    match err {
        SentiscopeError::InvalidInput(_)
        | SentiscopeError::InsufficientData
        | SentiscopeError::InvalidScore { .. }
        | SentiscopeError::Session(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(result: Result<Value>) -> (StatusCode, Json<Value>) {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(err) => {
            let status = status_for(&err);
            if status.is_server_error() {
                warn!(error = %err, "request failed");
            }
            (status, Json(json!({ "error": err.to_string() })))
        }
    }
}

pub fn router(registry: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/end_conversation", post(end_conversation))
        .route("/api/reset", post(reset))
        .route("/api/analyze", post(analyze))
        .with_state(registry)
}

/// Bind and serve until the process is stopped.
///
/// # Errors
///
/// Fails on invalid config or when the address cannot be bound.
pub async fn run_server(config: &SentiscopeConfig) -> anyhow::Result<()> {
    let services = ChatServices::from_config(config)?;
    let registry = Arc::new(SessionRegistry::new(services));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    info!("sentiscope API listening on http://{local_addr}");
    axum::serve(listener, router(registry)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn chat(State(registry): State<AppState>, Json(body): Json<ChatRequest>) -> impl IntoResponse {
    respond(registry.chat(body).await)
}

async fn end_conversation(
    State(registry): State<AppState>,
    Json(body): Json<SessionRequest>,
) -> impl IntoResponse {
    respond(registry.end(body.session_id).await)
}

async fn reset(State(registry): State<AppState>, Json(body): Json<SessionRequest>) -> impl IntoResponse {
    let session_id = registry.reset(body.session_id).await;
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "session_id": session_id,
        })),
    )
}

async fn analyze(
    State(registry): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    respond(registry.analyze(body.observations))
}
