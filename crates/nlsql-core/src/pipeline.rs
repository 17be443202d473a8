//! End-to-end request pipeline
//!
//! Wires the stages strictly in sequence: introspect schema, build prompt,
//! call the model, extract SQL, guard, execute, summarize. No stage retries
//! and no state is shared between requests.

use std::path::Path;

use crate::error::PipelineError;
use crate::exec::{self, QueryResult};
use crate::extract::{ensure_read_only, extract_sql};
use crate::llm::ModelClient;
use crate::prompt::build_prompt;
use crate::schema::DbSchema;
use crate::summary::{summarize, DEFAULT_DISPLAY_ROWS};

/// Everything one successful request produces.
#[derive(Debug)]
pub struct QueryOutcome {
    /// The extracted statement that was executed.
    pub sql: String,
    /// The model's reply before extraction.
    pub raw_reply: String,
    pub result: QueryResult,
    /// Markdown preview, absent when the result has no columns.
    pub summary: Option<String>,
}

/// The translation pipeline with its injected model client.
pub struct QueryPipeline {
    model: ModelClient,
    display_rows: usize,
}

impl QueryPipeline {
    pub fn new(model: ModelClient) -> Self {
        QueryPipeline {
            model,
            display_rows: DEFAULT_DISPLAY_ROWS,
        }
    }

    /// Override how many rows the summary shows.
    pub fn with_display_rows(mut self, display_rows: usize) -> Self {
        self.display_rows = display_rows;
        self
    }

    /// Answer `question` against the database at `db_path`.
    ///
    /// The model call is the only long-latency await; database work happens
    /// on short-lived connections opened and closed within their stage.
    pub async fn run(
        &self,
        db_path: &Path,
        question: &str,
        dialect: &str,
        max_tokens: u32,
    ) -> Result<QueryOutcome, PipelineError> {
        let schema = DbSchema::introspect(db_path)?;
        tracing::debug!(tables = schema.tables.len(), "schema introspected");

        let prompt = build_prompt(&schema.render(), question, dialect);
        let raw_reply = self.model.complete(&prompt, max_tokens).await?;

        let sql = extract_sql(&raw_reply)?;
        ensure_read_only(&sql)?;
        tracing::info!(%sql, "executing extracted statement");

        let result = exec::execute(db_path, &sql)?;
        tracing::debug!(rows = result.row_count, columns = result.columns.len(), "query executed");

        let summary = summarize(&result, self.display_rows);

        Ok(QueryOutcome {
            sql,
            raw_reply,
            result,
            summary,
        })
    }
}
