pub mod groq;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::llm::LlmConfig;
use self::groq::GroqChatClient;

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

/// Single-shot text completion, one outbound request per call. No retry, no
/// streaming; a failure propagates to the caller as a `Service` error.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse>;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn CompletionClient>> {
    let client = GroqChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
