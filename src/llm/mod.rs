pub mod chat;

/// Connection settings for the completion service. Model id and temperature
/// are fixed constants in the Groq adapter, not part of this config.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}
