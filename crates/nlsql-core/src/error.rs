//! Error taxonomy for the NL-to-SQL pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Every way a request can fail, one variant per pipeline stage.
///
/// No stage retries or substitutes a default; a failure here is the failure
/// of the whole request. The transport layer maps variants to status codes.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("model API key is not configured: set {0}")]
    Configuration(String),

    #[error("database file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to open database: {0}")]
    Connection(#[source] rusqlite::Error),

    #[error("model request failed: {0}")]
    Upstream(String),

    #[error("could not extract a SQL statement from the model reply: {0}")]
    Extraction(String),

    #[error("statement kind '{0}' is not allowed; read-only queries only")]
    ForbiddenStatement(String),

    #[error("SQL execution error: {source}; sql={sql}")]
    Query {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },
}
