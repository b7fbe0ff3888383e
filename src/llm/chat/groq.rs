use async_trait::async_trait;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };

use super::{ CompletionClient, CompletionResponse };
use crate::error::{ AgentError, Result };
use crate::llm::LlmConfig;

/// Fixed model configuration. These are deliberately not user-exposed.
const COMPLETION_MODEL: &str = "mixtral-8x7b-32768";
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 1024;

const DEFAULT_BASE_URL: &str = "https://api.groq.com";

pub struct GroqChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct GroqRequest {
    messages: Vec<GroqMessage>,
    model: String,
    temperature: f32,
    #[serde(rename = "max_tokens")]
    max_tokens: u32,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

#[derive(Deserialize)]
struct GroqErrorBody {
    error: GroqErrorDetail,
}

#[derive(Deserialize)]
struct GroqErrorDetail {
    message: String,
}

impl GroqChatClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self> {
        let api_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| AgentError::Service(format!("Invalid API key format: {}", e)))?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AgentError::Service(e.to_string()))?;

        Ok(Self {
            http,
            model: COMPLETION_MODEL.to_string(),
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| AgentError::Service("Groq API key is required".to_string()))?;

        Self::new(api_key, config.base_url.clone())
    }
}

#[async_trait]
impl CompletionClient for GroqChatClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        let url = format!(
            "{}/openai/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let messages = vec![GroqMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        let req = GroqRequest {
            messages,
            model: self.model.clone(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let http_resp = self.http.post(&url)
            .json(&req)
            .send()
            .await
            .map_err(|e| AgentError::Service(e.to_string()))?;

        if let Err(status_err) = http_resp.error_for_status_ref() {
            // Groq puts a human-readable message in the error body; prefer it
            // over the bare status code when present.
            let body = http_resp.text().await.unwrap_or_default();
            let detail = serde_json
                ::from_str::<GroqErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| status_err.to_string());
            return Err(AgentError::Service(detail));
        }

        let resp = http_resp
            .json::<GroqResponse>()
            .await
            .map_err(|e| AgentError::Service(e.to_string()))?;

        let content = resp.choices.first()
            .ok_or_else(|| AgentError::Service("No response from Groq API".to_string()))?
            .message.content.clone();

        Ok(CompletionResponse { response: content })
    }
}
