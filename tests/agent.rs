use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Arc, Mutex };

use sql_chat::agent::SqlAgent;
use sql_chat::db::{ ConnectionParams, DatabaseGateway, GatewayConnector };
use sql_chat::error::{ AgentError, Result };
use sql_chat::history::GREETING;
use sql_chat::llm::chat::{ CompletionClient, CompletionResponse };
use sql_chat::models::chat::Role;

/// Replays canned completions in order and records every prompt it was sent.
struct ScriptedCompletionClient {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletionClient {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let response = self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Service("completion service unavailable".to_string()))?;
        Ok(CompletionResponse { response })
    }
}

struct FakeGateway {
    schema: String,
    run_result: std::result::Result<String, String>,
    queries: Mutex<Vec<String>>,
    runs: AtomicUsize,
}

impl FakeGateway {
    fn new(schema: &str, run_result: std::result::Result<&str, &str>) -> Arc<Self> {
        Arc::new(Self {
            schema: schema.to_string(),
            run_result: run_result.map(|s| s.to_string()).map_err(|e| e.to_string()),
            queries: Mutex::new(Vec::new()),
            runs: AtomicUsize::new(0),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseGateway for FakeGateway {
    async fn get_table_info(&self) -> Result<String> {
        Ok(self.schema.clone())
    }

    async fn run(&self, sql: &str) -> Result<String> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(sql.to_string());
        self.run_result.clone().map_err(AgentError::Execution)
    }
}

/// Hands out a fixed sequence of gateways, one per successful connect.
/// Refuses to connect when the database field is empty, as the real driver
/// would.
struct FakeConnector {
    gateways: Mutex<VecDeque<Arc<FakeGateway>>>,
}

impl FakeConnector {
    fn new(gateways: Vec<Arc<FakeGateway>>) -> Arc<Self> {
        Arc::new(Self {
            gateways: Mutex::new(gateways.into()),
        })
    }
}

#[async_trait]
impl GatewayConnector for FakeConnector {
    async fn connect(&self, params: &ConnectionParams) -> Result<Arc<dyn DatabaseGateway>> {
        if params.database.is_empty() {
            return Err(AgentError::Connection("Unknown database ''".to_string()));
        }
        let gateway = self.gateways
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Connection("no gateway available".to_string()))?;
        Ok(gateway)
    }
}

fn params(database: &str) -> ConnectionParams {
    ConnectionParams {
        host: "localhost".to_string(),
        port: "3306".to_string(),
        username: "root".to_string(),
        password: "secret".to_string(),
        database: database.to_string(),
    }
}

const SCHEMA: &str = "Table: Track\n  TrackId int NOT NULL PRIMARY KEY\n  ArtistId int NOT NULL\n";

#[tokio::test]
async fn log_holds_one_plus_two_turns_per_question() {
    let llm = ScriptedCompletionClient::new(
        &["SELECT 1;", "There is one.", "SELECT 2;", "There are two."]
    );
    let gateway = FakeGateway::new(SCHEMA, Ok("[(1,)]"));
    let connector = FakeConnector::new(vec![gateway]);
    let mut agent = SqlAgent::with_components(llm, connector);

    agent.connect(&params("chinook")).await.unwrap();
    assert_eq!(agent.history().len(), 1);

    agent.ask("first question").await.unwrap();
    agent.ask("second question").await.unwrap();

    let turns = agent.history().turns();
    assert_eq!(turns.len(), 5);
    assert_eq!(turns[0].role, Role::Ai);
    assert_eq!(turns[0].content, GREETING);
    assert_eq!(turns[1].role, Role::Human);
    assert_eq!(turns[1].content, "first question");
    assert_eq!(turns[2].role, Role::Ai);
    assert_eq!(turns[2].content, "There is one.");
    assert_eq!(turns[3].role, Role::Human);
    assert_eq!(turns[3].content, "second question");
    assert_eq!(turns[4].role, Role::Ai);
    assert_eq!(turns[4].content, "There are two.");
}

#[tokio::test]
async fn failed_query_appends_no_turns() {
    let llm = ScriptedCompletionClient::new(&["SELECT broken"]);
    let gateway = FakeGateway::new(SCHEMA, Err("syntax error near 'broken'"));
    let connector = FakeConnector::new(vec![gateway]);
    let mut agent = SqlAgent::with_components(llm, connector);

    agent.connect(&params("chinook")).await.unwrap();
    let err = agent.ask("bad question").await.unwrap_err();

    assert!(matches!(err, AgentError::Execution(_)));
    assert_eq!(agent.history().len(), 1, "only the seeded greeting should remain");
}

#[tokio::test]
async fn completion_failure_appends_no_turns() {
    // Empty script: the very first completion call fails.
    let llm = ScriptedCompletionClient::new(&[]);
    let gateway = FakeGateway::new(SCHEMA, Ok("[]"));
    let connector = FakeConnector::new(vec![Arc::clone(&gateway)]);
    let mut agent = SqlAgent::with_components(llm, connector);

    agent.connect(&params("chinook")).await.unwrap();
    let err = agent.ask("anything").await.unwrap_err();

    assert!(matches!(err, AgentError::Service(_)));
    assert_eq!(agent.history().len(), 1);
    assert_eq!(gateway.run_count(), 0, "no query should run when SQL generation fails");
}

#[tokio::test]
async fn ask_before_connect_is_rejected() {
    let llm = ScriptedCompletionClient::new(&[]);
    let connector = FakeConnector::new(vec![]);
    let mut agent = SqlAgent::with_components(llm, connector);

    let err = agent.ask("who is there?").await.unwrap_err();
    assert!(matches!(err, AgentError::NotConnected));
    assert_eq!(agent.history().len(), 1);
}

#[tokio::test]
async fn reconnect_replaces_the_handle() {
    let llm = ScriptedCompletionClient::new(&["SELECT 1;", "answer"]);
    let old_gateway = FakeGateway::new(SCHEMA, Ok("[]"));
    let new_gateway = FakeGateway::new(SCHEMA, Ok("[]"));
    let connector = FakeConnector::new(vec![Arc::clone(&old_gateway), Arc::clone(&new_gateway)]);
    let mut agent = SqlAgent::with_components(llm, connector);

    agent.connect(&params("old_db")).await.unwrap();
    agent.connect(&params("new_db")).await.unwrap();
    agent.ask("question").await.unwrap();

    assert_eq!(old_gateway.run_count(), 0, "old handle must see no traffic after reconnect");
    assert_eq!(new_gateway.run_count(), 1);
}

#[tokio::test]
async fn connect_with_empty_database_stays_disconnected() {
    let llm = ScriptedCompletionClient::new(&[]);
    let gateway = FakeGateway::new(SCHEMA, Ok("[]"));
    let connector = FakeConnector::new(vec![gateway]);
    let mut agent = SqlAgent::with_components(llm, connector);

    let err = agent.connect(&params("")).await.unwrap_err();
    assert!(matches!(err, AgentError::Connection(_)));
    assert!(!agent.is_connected());
    assert_eq!(agent.history().len(), 1);
}

#[tokio::test]
async fn failed_connect_keeps_previous_handle() {
    let llm = ScriptedCompletionClient::new(&["SELECT 1;", "answer"]);
    let gateway = FakeGateway::new(SCHEMA, Ok("[]"));
    let connector = FakeConnector::new(vec![Arc::clone(&gateway)]);
    let mut agent = SqlAgent::with_components(llm, connector);

    agent.connect(&params("chinook")).await.unwrap();
    agent.connect(&params("")).await.unwrap_err();

    assert!(agent.is_connected());
    agent.ask("still works?").await.unwrap();
    assert_eq!(gateway.run_count(), 1);
}

#[tokio::test]
async fn generated_sql_and_result_reach_the_answer_prompt_verbatim() {
    let sql =
        "SELECT ArtistId, COUNT(*) as track_count FROM Track GROUP BY ArtistId ORDER BY track_count DESC LIMIT 3;";
    let result = "[(22, 114), (58, 92), (90, 57)]";
    let question = "Who are the top 3 artists with the most tracks?";

    let llm = ScriptedCompletionClient::new(&[sql, "The top artists are 22, 58 and 90."]);
    let gateway = FakeGateway::new(SCHEMA, Ok(result));
    let connector = FakeConnector::new(vec![Arc::clone(&gateway)]);
    let mut agent = SqlAgent::with_components(Arc::clone(&llm) as Arc<dyn CompletionClient>, connector);

    agent.connect(&params("chinook")).await.unwrap();
    let answer = agent.ask(question).await.unwrap();
    assert_eq!(answer, "The top artists are 22, 58 and 90.");

    // The gateway must receive exactly the generated SQL.
    assert_eq!(gateway.queries(), vec![sql.to_string()]);

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 2);

    // First prompt: schema and question in their slots, history holds only
    // the seeded greeting (the question is not part of history yet).
    assert!(prompts[0].contains(&format!("<SCHEMA> {} </SCHEMA>", SCHEMA)));
    assert!(prompts[0].contains(&format!("Question: {}", question)));
    assert!(prompts[0].contains(&format!("Assistant: {}", GREETING)));

    // Second prompt: the exact SQL and the exact result text in their slots.
    assert!(prompts[1].contains(&format!("SQL Query: <SQL> {} </SQL>", sql)));
    assert!(prompts[1].contains(&format!("SQL Response: {}", result)));
    assert!(prompts[1].contains(&format!("Question: {}", question)));
}

#[tokio::test]
async fn history_is_resent_in_full_on_later_questions() {
    let llm = ScriptedCompletionClient::new(
        &["SELECT 1;", "first answer", "SELECT 2;", "second answer"]
    );
    let gateway = FakeGateway::new(SCHEMA, Ok("[]"));
    let connector = FakeConnector::new(vec![gateway]);
    let mut agent = SqlAgent::with_components(Arc::clone(&llm) as Arc<dyn CompletionClient>, connector);

    agent.connect(&params("chinook")).await.unwrap();
    agent.ask("first question").await.unwrap();
    agent.ask("second question").await.unwrap();

    let prompts = llm.prompts();
    // Third prompt overall is the SQL-generation prompt of the second
    // question; it must carry the full prior exchange.
    assert!(prompts[2].contains("User: first question"));
    assert!(prompts[2].contains("Assistant: first answer"));
}
