pub mod mysql;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

/// Settings-form fields, all strings, passed through to the driver untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// A live database connection with its schema-description capability.
///
/// `run` executes whatever SQL it is handed, verbatim. The generated query is
/// trusted as-is; sanitization is an open question recorded in DESIGN.md.
#[async_trait]
pub trait DatabaseGateway: Send + Sync {
    /// Textual summary of the connected database's tables and columns, as fed
    /// to the prompt templates.
    async fn get_table_info(&self) -> Result<String>;

    /// Executes a SQL statement and renders the result set as text.
    async fn run(&self, sql: &str) -> Result<String>;
}

/// Seam for establishing connections, so the session can be exercised against
/// a fake database in tests.
#[async_trait]
pub trait GatewayConnector: Send + Sync {
    async fn connect(&self, params: &ConnectionParams) -> Result<Arc<dyn DatabaseGateway>>;
}

pub fn new_connector() -> Arc<dyn GatewayConnector> {
    Arc::new(mysql::MySqlConnector)
}
