//! Natural-language-to-SQL translation pipeline
//!
//! Turns an English question plus a SQLite database path into one executed
//! read-only query: schema introspection → prompt construction → model call →
//! heuristic SQL extraction → guarded execution → tabular summary. The HTTP
//! transport lives in `nlsql-server`; this crate is transport-free.

pub mod error;
pub mod exec;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod schema;
pub mod summary;

pub use error::PipelineError;
pub use exec::QueryResult;
pub use llm::ModelClient;
pub use pipeline::{QueryOutcome, QueryPipeline};
pub use schema::DbSchema;
