//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` and `streamGenerateContent`
//! APIs.  Auth is via an API key passed as a query parameter
//! (`key={api_key}`), resolved once from the configured environment
//! variable at construction time.

use serde_json::Value;
use std::time::Duration;

use sp_domain::chat::{Message, Role};
use sp_domain::config::LlmConfig;
use sp_domain::error::{Error, Result};
use sp_domain::stream::{BoxStream, StreamEvent, Usage};

use crate::traits::{ChatRequest, ChatResponse, LlmProvider};
use crate::util::{from_reqwest, resolve_api_key};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An adapter for the Google Gemini API.
pub struct GoogleClient {
    base_url: String,
    api_key: String,
    default_model: String,
    max_output_tokens: u32,
    client: reqwest::Client,
}

impl GoogleClient {
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        let api_key = resolve_api_key(&cfg.api_key_env)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            default_model: cfg.model.clone(),
            max_output_tokens: cfg.max_output_tokens,
            client,
        })
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, model, self.api_key
        )
    }

    fn build_body(&self, req: &ChatRequest) -> Value {
        let contents: Vec<Value> = req.messages.iter().map(message_to_gemini).collect();

        serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": req.max_tokens.unwrap_or(self.max_output_tokens),
            },
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message serialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn message_to_gemini(msg: &Message) -> Value {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "model",
    };
    serde_json::json!({
        "role": role,
        "parts": [{"text": msg.content}],
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_gemini_response(body: &Value, model: &str) -> Result<ChatResponse> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: "google".into(),
            message: "no candidates in response".into(),
        })?;

    let mut content = String::new();
    if let Some(parts) = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        for part in parts {
            if let Some(text) = part.get("text").and_then(|v| v.as_str()) {
                content.push_str(text);
            }
        }
    }

    let finish_reason = candidate
        .get("finishReason")
        .and_then(|v| v.as_str())
        .map(normalize_finish_reason);

    let usage = body.get("usageMetadata").and_then(parse_gemini_usage);

    Ok(ChatResponse {
        content,
        usage,
        model: model.to_string(),
        finish_reason,
    })
}

fn normalize_finish_reason(raw: &str) -> String {
    match raw {
        "STOP" => "stop".to_string(),
        "MAX_TOKENS" => "length".to_string(),
        other => other.to_lowercase(),
    }
}

fn parse_gemini_usage(v: &Value) -> Option<Usage> {
    let prompt = v.get("promptTokenCount")?.as_u64()? as u32;
    let completion = v
        .get("candidatesTokenCount")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;
    let total = v
        .get("totalTokenCount")
        .and_then(|v| v.as_u64())
        .unwrap_or((prompt + completion) as u64) as u32;
    Some(Usage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: total,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Streaming helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse one Gemini streaming SSE payload into stream events.
fn parse_gemini_sse_data(data: &str) -> Vec<Result<StreamEvent>> {
    let mut events = Vec::new();

    let v: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            events.push(Err(Error::Json(e)));
            return events;
        }
    };

    let candidate = match v
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
    {
        Some(c) => c,
        None => return events,
    };

    if let Some(parts) = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        for part in parts {
            if let Some(text) = part.get("text").and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    events.push(Ok(StreamEvent::Token {
                        text: text.to_string(),
                    }));
                }
            }
        }
    }

    if let Some(fr) = candidate.get("finishReason").and_then(|v| v.as_str()) {
        let usage = v.get("usageMetadata").and_then(parse_gemini_usage);
        events.push(Ok(StreamEvent::Done {
            usage,
            finish_reason: Some(normalize_finish_reason(fr)),
        }));
    }

    events
}

/// Redact the API key from a URL for safe logging.
fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl LlmProvider for GoogleClient {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let model = req
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let url = self.generate_url(&model);
        let body = self.build_body(req);

        tracing::debug!(url = %redact_url_key(&url), "gemini chat request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Provider {
                provider: "google".into(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_gemini_response(&resp_json, &model)
    }

    async fn chat_stream(
        &self,
        req: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<StreamEvent>>> {
        let model = req
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let url = self.stream_url(&model);
        let body = self.build_body(req);

        tracing::debug!(url = %redact_url_key(&url), "gemini stream request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let err_text = resp.text().await.map_err(from_reqwest)?;
            return Err(Error::Provider {
                provider: "google".into(),
                message: format!("HTTP {} - {}", status.as_u16(), err_text),
            });
        }

        Ok(crate::sse::response_stream(resp, parse_gemini_sse_data))
    }

    fn provider_id(&self) -> &str {
        "google"
    }
}
