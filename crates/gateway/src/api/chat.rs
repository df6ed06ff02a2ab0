//! The conversation relay — `POST /api/chat`.
//!
//! One request carries the user message plus the prior turns of the
//! session.  On the first turn (empty history) the CRM snapshot is
//! aggregated and composed into the outbound message; later turns go to
//! the model unchanged.  The model's incremental output is forwarded to
//! the client as an SSE sequence of `data: {"text": ...}` lines closed
//! by a `data: [DONE]` marker.

use std::sync::OnceLock;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use futures_util::{Stream, StreamExt};
use regex::Regex;
use serde::Deserialize;

use sp_crm::CrmFetch;
use sp_domain::chat::{Message, Turn};
use sp_domain::config::SnapshotConfig;
use sp_domain::entity::AuthContext;
use sp_domain::stream::{BoxStream, StreamEvent};
use sp_prompt::{ACKNOWLEDGMENT, SYSTEM_PREAMBLE};
use sp_providers::ChatRequest;

use crate::api::auth::auth_from_headers;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request shape
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    /// User message text.
    pub message: String,
    /// Prior turns of this session, oldest first.
    #[serde(default)]
    pub history: Vec<Turn>,
    /// Free-text detail of the lead currently open in the UI, injected
    /// verbatim as the priority context block.
    #[serde(default)]
    pub focused_entity_context: Option<String>,
    /// Structured id of the open lead, excluded from the general
    /// snapshot sample.  Older clients omit this and rely on the id
    /// being recoverable from `focused_entity_context`.
    #[serde(default)]
    pub focused_lead_id: Option<String>,
}

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Map a body-extraction rejection onto the standard JSON error shape.
/// Axum's default rejection is a plain-text body; every error this API
/// emits is JSON.
fn invalid_body(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection.body_text(), "rejecting malformed chat request");
    api_error(rejection.status(), "invalid request body")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn chat_stream(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };

    if body.message.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "message must not be empty");
    }

    let auth = auth_from_headers(&headers);
    let (mut messages, outbound) =
        prepare_turn(state.crm.as_ref(), &auth, &state.config.snapshot, &body).await;
    messages.push(Message::user(outbound));

    let req = ChatRequest {
        messages,
        max_tokens: Some(state.config.llm.max_output_tokens),
        model: None,
    };

    let upstream = match state.llm.chat_stream(&req).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "model service dispatch failed");
            return api_error(StatusCode::BAD_GATEWAY, "failed to reach the model service");
        }
    };

    let stream = relay_payloads(upstream).map(|result| result.map(|p| Event::default().data(p)));

    (
        [(header::CACHE_CONTROL, "no-cache")],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
        .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turn preparation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build the model history and the outbound message for one turn.
///
/// History always opens with the fixed preamble exchange, followed by
/// the caller's prior turns role-mapped.  The snapshot is aggregated and
/// injected only on the first turn of a session; when aggregation
/// yields nothing, the raw message goes out unmodified — a missing
/// context is degradation, not failure.
pub(crate) async fn prepare_turn(
    crm: &dyn CrmFetch,
    auth: &AuthContext,
    limits: &SnapshotConfig,
    body: &ChatBody,
) -> (Vec<Message>, String) {
    let mut messages = vec![
        Message::user(SYSTEM_PREAMBLE),
        Message::assistant(ACKNOWLEDGMENT),
    ];
    messages.extend(body.history.iter().map(Turn::to_message));

    if !body.history.is_empty() {
        return (messages, body.message.clone());
    }

    let focused = body.focused_lead_id.clone().or_else(|| {
        body.focused_entity_context
            .as_deref()
            .and_then(extract_focused_lead_id)
    });

    tracing::info!(
        user_id = auth.user_id,
        focused = focused.as_deref().unwrap_or("-"),
        "first turn, aggregating CRM context"
    );

    let outbound = match sp_crm::aggregate(crm, auth, &auth.user_name, focused.as_deref(), limits)
        .await
    {
        Some(snapshot) => sp_prompt::compose(&snapshot, body.focused_entity_context.as_deref(), &body.message),
        None => {
            tracing::warn!("context aggregation unavailable, sending raw message");
            body.message.clone()
        }
    };

    (messages, outbound)
}

/// Recover the focused lead id from the free-text context block sent by
/// older clients (`Lead ID: <digits>`).
fn extract_focused_lead_id(context: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| Regex::new(r"Lead ID:\s*(\d+)").expect("static pattern"));
    re.captures(context).map(|c| c[1].to_string())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Relay
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Map the provider stream onto the wire payload sequence: one
/// `{"text": ...}` payload per token in emission order, then the
/// literal `[DONE]` marker.
///
/// A mid-stream error puts the channel into the error state and closes
/// it without the terminal marker.  Dropping the returned stream
/// (client disconnect) drops the upstream provider stream with it, so
/// no further fragments are consumed.
pub(crate) fn relay_payloads(
    mut upstream: BoxStream<'static, sp_domain::error::Result<StreamEvent>>,
) -> impl Stream<Item = Result<String, axum::BoxError>> {
    async_stream::stream! {
        while let Some(event) = upstream.next().await {
            match event {
                Ok(StreamEvent::Token { text }) => {
                    yield Ok(serde_json::json!({ "text": text }).to_string());
                }
                Ok(StreamEvent::Done { .. }) => {
                    yield Ok("[DONE]".to_string());
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "model stream failed mid-flight");
                    yield Err(Box::new(e) as axum::BoxError);
                    break;
                }
            }
        }
    }
}
