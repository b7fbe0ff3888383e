use async_trait::async_trait;
use log::info;
use sqlx::mysql::{ MySqlPool, MySqlRow };
use sqlx::{ Column, Row, TypeInfo };
use std::sync::Arc;

use super::{ ConnectionParams, DatabaseGateway, GatewayConnector };
use crate::error::{ AgentError, Result };

pub struct MySqlConnector;

#[async_trait]
impl GatewayConnector for MySqlConnector {
    async fn connect(&self, params: &ConnectionParams) -> Result<Arc<dyn DatabaseGateway>> {
        let gateway = MySqlGateway::connect(params).await?;
        Ok(Arc::new(gateway))
    }
}

pub struct MySqlGateway {
    pool: MySqlPool,
}

impl MySqlGateway {
    pub async fn connect(params: &ConnectionParams) -> Result<Self> {
        let url = format!(
            "mysql://{}:{}@{}:{}/{}",
            params.username,
            params.password,
            params.host,
            params.port,
            params.database
        );
        let pool = MySqlPool::connect(&url).await
            .map_err(|e| AgentError::Connection(e.to_string()))?;
        info!("Connected to MySQL database '{}' at {}:{}", params.database, params.host, params.port);
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseGateway for MySqlGateway {
    async fn get_table_info(&self) -> Result<String> {
        let rows = sqlx::query(
            "SELECT TABLE_NAME, COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_KEY \
             FROM information_schema.columns \
             WHERE TABLE_SCHEMA = DATABASE() \
             ORDER BY TABLE_NAME, ORDINAL_POSITION"
        )
            .fetch_all(&self.pool).await
            .map_err(|e| AgentError::Execution(e.to_string()))?;

        let mut description = String::new();
        let mut current_table = String::new();

        for row in &rows {
            let table: String = row.try_get("TABLE_NAME")
                .map_err(|e| AgentError::Execution(e.to_string()))?;
            let column: String = row.try_get("COLUMN_NAME")
                .map_err(|e| AgentError::Execution(e.to_string()))?;
            let column_type: String = row.try_get("COLUMN_TYPE")
                .map_err(|e| AgentError::Execution(e.to_string()))?;
            let nullable: String = row.try_get("IS_NULLABLE")
                .map_err(|e| AgentError::Execution(e.to_string()))?;
            let key: String = row.try_get("COLUMN_KEY")
                .map_err(|e| AgentError::Execution(e.to_string()))?;

            if table != current_table {
                if !description.is_empty() {
                    description.push('\n');
                }
                description.push_str(&format!("Table: {}\n", table));
                current_table = table;
            }

            description.push_str(&format!("  {} {}", column, column_type));
            if nullable == "NO" {
                description.push_str(" NOT NULL");
            }
            if key == "PRI" {
                description.push_str(" PRIMARY KEY");
            }
            description.push('\n');
        }

        Ok(description)
    }

    async fn run(&self, sql: &str) -> Result<String> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool).await
            .map_err(|e| AgentError::Execution(e.to_string()))?;

        Ok(render_rows(&rows))
    }
}

/// Renders a result set as a list of tuples, one row per line. This is the
/// text the answer-synthesis prompt sees as the "SQL Response".
fn render_rows(rows: &[MySqlRow]) -> String {
    if rows.is_empty() {
        return "[]".to_string();
    }

    let mut out = String::from("[");
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('(');
        for idx in 0..row.columns().len() {
            if idx > 0 {
                out.push_str(", ");
            }
            out.push_str(&column_value_to_text(row, idx));
        }
        out.push(')');
    }
    out.push(']');
    out
}

fn column_value_to_text(row: &MySqlRow, idx: usize) -> String {
    use sqlx::ValueRef;

    let raw = match row.try_get_raw(idx) {
        Ok(raw) => raw,
        Err(_) => return "NULL".to_string(),
    };
    if raw.is_null() {
        return "NULL".to_string();
    }

    let type_name = row.column(idx).type_info().name().to_string();
    match type_name.as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<i64, _>(idx)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| "?".to_string()),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row
            .try_get::<u64, _>(idx)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| "?".to_string()),
        "FLOAT" => row
            .try_get::<f32, _>(idx)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| "?".to_string()),
        "DOUBLE" => row
            .try_get::<f64, _>(idx)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| "?".to_string()),
        "BOOLEAN" => row
            .try_get::<bool, _>(idx)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| "?".to_string()),
        "DATE" => row
            .try_get::<chrono::NaiveDate, _>(idx)
            .map(|v| format!("'{}'", v))
            .unwrap_or_else(|_| "?".to_string()),
        "TIME" => row
            .try_get::<chrono::NaiveTime, _>(idx)
            .map(|v| format!("'{}'", v))
            .unwrap_or_else(|_| "?".to_string()),
        "DATETIME" => row
            .try_get::<chrono::NaiveDateTime, _>(idx)
            .map(|v| format!("'{}'", v))
            .unwrap_or_else(|_| "?".to_string()),
        "TIMESTAMP" => row
            .try_get::<chrono::DateTime<chrono::Utc>, _>(idx)
            .map(|v| format!("'{}'", v))
            .unwrap_or_else(|_| "?".to_string()),
        _ => row
            .try_get::<String, _>(idx)
            .map(|v| format!("'{}'", v))
            .unwrap_or_else(|_| "?".to_string()),
    }
}
