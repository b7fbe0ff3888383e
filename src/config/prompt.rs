//! The two fixed prompt templates of the question-answering chain.
//!
//! Rendering is plain placeholder substitution, so a given (schema, history,
//! question) triple always produces the same prompt text.

const SQL_QUERY_TEMPLATE: &str = "\
You are a senior data analyst.
Based on the table schema provided below, write a SQL query that answers the question.
Consider the conversation history.

<SCHEMA> {schema} </SCHEMA>

Conversation History: {conversation_history}

Write only the SQL query without any additional text.

For example:
Question: Who are the top 3 artists with the most tracks?
SQL Query: SELECT ArtistId, COUNT(*) as track_count FROM Track GROUP BY ArtistId ORDER BY track_count DESC LIMIT 3;

Response Format:
    Question: {question}
    SQL Query:
";

const ANSWER_TEMPLATE: &str = "\
You are a senior data analyst.
Given the database schema details, question, SQL query, and SQL response,
write a natural language response for the SQL query.

<SCHEMA> {schema} </SCHEMA>

Conversation History: {conversation_history}
SQL Query: <SQL> {sql_query} </SQL>
Question: {question}
SQL Response: {response}

Response Format:
    SQL Query:
    Natural Language Response:
";

pub fn get_sql_query_prompt(schema: &str, conversation_history: &str, question: &str) -> String {
    SQL_QUERY_TEMPLATE
        .replace("{schema}", schema)
        .replace("{conversation_history}", conversation_history)
        .replace("{question}", question)
}

pub fn get_answer_prompt(
    schema: &str,
    conversation_history: &str,
    sql_query: &str,
    question: &str,
    response: &str
) -> String {
    ANSWER_TEMPLATE
        .replace("{schema}", schema)
        .replace("{conversation_history}", conversation_history)
        .replace("{sql_query}", sql_query)
        .replace("{question}", question)
        .replace("{response}", response)
}
