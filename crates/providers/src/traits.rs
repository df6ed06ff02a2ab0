use sp_domain::chat::Message;
use sp_domain::error::Result;
use sp_domain::stream::{BoxStream, StreamEvent, Usage};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A provider-agnostic chat completion request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// The conversation messages to send, oldest first.
    pub messages: Vec<Message>,
    /// Maximum tokens in the response. `None` lets the provider choose.
    pub max_tokens: Option<u32>,
    /// Model identifier override. When `None`, the provider uses its default.
    pub model: Option<String>,
}

/// A provider-agnostic chat completion response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Textual content of the response.
    pub content: String,
    /// Token usage information.
    pub usage: Option<Usage>,
    /// The model that actually produced the response.
    pub model: String,
    /// The reason the model stopped generating (e.g. "stop", "length").
    pub finish_reason: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core provider trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Trait every model-service adapter implements.
///
/// The relay only depends on this seam, which is also what the gateway
/// tests stand in for with a scripted double.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request and wait for the full response.
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse>;

    /// Send a chat completion request and return a stream of events.
    async fn chat_stream(
        &self,
        req: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<StreamEvent>>>;

    /// A unique identifier for this provider instance.
    fn provider_id(&self) -> &str;
}
