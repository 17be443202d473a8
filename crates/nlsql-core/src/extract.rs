//! Heuristic SQL extraction from free-form model replies
//!
//! Model replies mix code fences, prose and trailing explanations around the
//! statement we actually want. Rather than parse SQL, this module applies a
//! fixed chain of text transforms: fence isolation, residual-fence stripping,
//! keyword anchoring, then boundary trimming at the last semicolon. Fence
//! isolation has to run before keyword anchoring so prose outside a fenced
//! block cannot anchor ahead of the genuine SQL inside it.

use crate::error::PipelineError;

const FENCE: &str = "```";

/// Statement-starting keywords used for anchoring, lower case.
const SQL_KEYWORDS: [&str; 5] = ["select", "with", "insert", "update", "delete"];

/// Leading keywords the read-only guard accepts.
const READ_ONLY_KEYWORDS: [&str; 2] = ["select", "with"];

/// Isolate a single SQL statement from a raw model reply.
///
/// Deterministic: the output depends only on `reply`. The result is trimmed,
/// non-empty and ends at the last semicolon when one is present, but carries
/// no guarantee of syntactic validity; that is deferred to execution.
pub fn extract_sql(reply: &str) -> Result<String, PipelineError> {
    let mut text = reply.trim().to_string();

    // Pass 1: if the reply carries fenced blocks, keep only the first one.
    if text.contains(FENCE) {
        let mut parts = text.split(FENCE);
        parts.next();
        if let Some(first_block) = parts.next() {
            text = strip_dialect_label(first_block).to_string();
        }
    }

    // Pass 2: residual fence characters from malformed fencing.
    if text.starts_with(FENCE) {
        let stripped = text.trim_matches(|c| c == '`' || c == '\n' || c == ' ');
        text = strip_dialect_label(stripped).to_string();
    }

    // Pass 3: anchor at the earliest statement-starting keyword. ASCII
    // lowercasing keeps byte offsets valid in the original text.
    let lowered = text.to_ascii_lowercase();
    let start = SQL_KEYWORDS
        .iter()
        .filter_map(|kw| lowered.find(kw))
        .min()
        .ok_or_else(|| PipelineError::Extraction("no SQL keyword found".to_string()))?;
    let mut sql = &text[start..];

    // Pass 4: drop anything the model appended after the last semicolon.
    if let Some(semi) = sql.rfind(';') {
        sql = &sql[..=semi];
    }

    Ok(sql.trim().to_string())
}

/// Drop a leading case-insensitive `sql` language label left over from a
/// fence, plus the newline after it.
fn strip_dialect_label(block: &str) -> &str {
    let trimmed = block.trim();
    if trimmed
        .get(..3)
        .is_some_and(|label| label.eq_ignore_ascii_case("sql"))
    {
        trimmed[3..].trim_start_matches('\n').trim()
    } else {
        trimmed
    }
}

/// Reject statements whose leading keyword is not in the read-only allow-list.
///
/// The prompt already asks for read-only queries; this is the enforcement the
/// prompt alone cannot give. Runs after extraction so a mutating statement is
/// reported by kind instead of as a failed extraction.
pub fn ensure_read_only(sql: &str) -> Result<(), PipelineError> {
    let keyword: String = sql
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if READ_ONLY_KEYWORDS.contains(&keyword.as_str()) {
        Ok(())
    } else {
        Err(PipelineError::ForbiddenStatement(keyword))
    }
}
