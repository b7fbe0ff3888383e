use log::info;
use std::sync::Arc;

use crate::cli::Args;
use crate::config::prompt;
use crate::db::{ self, ConnectionParams, DatabaseGateway, GatewayConnector };
use crate::error::{ AgentError, Result };
use crate::history::{ format_history_for_prompt, ConversationLog };
use crate::llm::LlmConfig;
use crate::llm::chat::{ new_client as new_chat_client, CompletionClient };
use crate::models::chat::Turn;

/// One chat session: the completion client, the database connection (if any)
/// and the conversation log. Created at session start, dropped at session end.
///
/// Connection lifecycle is two states, Disconnected and Connected. `connect`
/// moves forward or replaces the handle; there is no disconnect action, and a
/// dead connection is only discovered when the next query fails.
pub struct SqlAgent {
    chat_client: Arc<dyn CompletionClient>,
    connector: Arc<dyn GatewayConnector>,
    gateway: Option<Arc<dyn DatabaseGateway>>,
    history: ConversationLog,
}

impl SqlAgent {
    pub fn new(args: &Args) -> Result<Self> {
        let chat_config = LlmConfig {
            api_key: Some(args.groq_api_key.clone()).filter(|k| !k.is_empty()),
            base_url: args.chat_base_url.clone(),
        };
        let chat_client = new_chat_client(&chat_config)?;
        info!(
            "Chat client configured: BaseURL={:?}",
            chat_config.base_url.as_deref().unwrap_or("adapter default")
        );

        Ok(Self::with_components(chat_client, db::new_connector()))
    }

    /// Assembles a session from explicit collaborators. Tests use this with
    /// fake clients and gateways.
    pub fn with_components(
        chat_client: Arc<dyn CompletionClient>,
        connector: Arc<dyn GatewayConnector>
    ) -> Self {
        Self {
            chat_client,
            connector,
            gateway: None,
            history: ConversationLog::new(),
        }
    }

    /// Connects to the database described by `params`. On success the new
    /// handle replaces any previous one; on failure the current state (and
    /// any existing handle) is untouched.
    pub async fn connect(&mut self, params: &ConnectionParams) -> Result<()> {
        let gateway = self.connector.connect(params).await?;
        self.gateway = Some(gateway);
        info!("Database handle established for '{}'", params.database);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn history(&self) -> &ConversationLog {
        &self.history
    }

    /// Schema description of the currently connected database.
    pub async fn table_info(&self) -> Result<String> {
        let gateway = self.require_gateway()?;
        gateway.get_table_info().await
    }

    /// Answers a question and, only on full success, appends the Human turn
    /// and the AI turn to the log. Any failure leaves the log untouched.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        let gateway = self.require_gateway()?;
        let schema = gateway.get_table_info().await?;
        let history = self.history.turns().to_vec();

        let answer = self.synthesize_answer(question, &history, &schema).await?;

        self.history.append(Turn::human(question));
        self.history.append(Turn::ai(answer.clone()));
        Ok(answer)
    }

    /// Renders the SQL-generation prompt and returns the completion text
    /// verbatim. The model's output is trusted as the query to execute.
    pub async fn generate_sql(
        &self,
        question: &str,
        history: &[Turn],
        schema: &str
    ) -> Result<String> {
        let history_str = format_history_for_prompt(history);
        let sql_prompt = prompt::get_sql_query_prompt(schema, &history_str, question);
        let resp = self.chat_client.complete(&sql_prompt).await?;
        Ok(resp.response)
    }

    /// Full two-stage chain: generate SQL, execute it, then ask the model for
    /// a natural-language rendering of the result. No caching; identical
    /// questions re-issue both completion calls.
    pub async fn synthesize_answer(
        &self,
        question: &str,
        history: &[Turn],
        schema: &str
    ) -> Result<String> {
        let gateway = self.require_gateway()?;

        let sql_query = self.generate_sql(question, history, schema).await?;
        info!("Generated SQL: {}", sql_query);

        let query_result = gateway.run(&sql_query).await?;

        let history_str = format_history_for_prompt(history);
        let answer_prompt = prompt::get_answer_prompt(
            schema,
            &history_str,
            &sql_query,
            question,
            &query_result
        );
        let resp = self.chat_client.complete(&answer_prompt).await?;
        Ok(resp.response)
    }

    fn require_gateway(&self) -> Result<Arc<dyn DatabaseGateway>> {
        self.gateway.clone().ok_or(AgentError::NotConnected)
    }
}
