use thiserror::Error;

/// Failure taxonomy for the chat session.
///
/// Nothing is retried or recovered internally: `Connection` is caught at the
/// connect boundary and shown to the user, everything else propagates out of
/// the current question and fails it whole.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The database could not be reached or refused the credentials.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// A query failed at execution time (invalid generated SQL, dead
    /// connection, runtime database error).
    #[error("query execution failed: {0}")]
    Execution(String),

    /// The completion service was unreachable or returned an error.
    #[error("completion service failed: {0}")]
    Service(String),

    /// A question was asked before a database connection was established.
    #[error("not connected to a database, use /connect first")]
    NotConnected,
}

pub type Result<T> = std::result::Result<T, AgentError>;
