pub mod google;
pub mod traits;
pub(crate) mod sse;
pub(crate) mod util;

// Re-exports for convenience.
pub use google::GoogleClient;
pub use traits::{ChatRequest, ChatResponse, LlmProvider};
