//! Prompt construction for the model call

/// Fixed instructions appended to every prompt.
///
/// The read-only requirement lives here as a prompt-level convention; the
/// pipeline additionally rejects non-SELECT statements before execution.
const INSTRUCTIONS: &str = "Return a single SQLite query that correctly answers the question. \
Use proper JOINs when needed. Do not modify data. Read-only queries only. \
Treat all text comparisons as case-insensitive by default (for example using COLLATE NOCASE \
or LOWER() on both sides of the comparison). For instance, if the question says severity 'high' \
and the data stores 'High', still return those rows by using a case-insensitive comparison.";

/// Combine the rendered schema, the user's question and the fixed
/// instructions into one prompt. Pure; deterministic for identical inputs.
pub fn build_prompt(schema_text: &str, question: &str, dialect: &str) -> String {
    format!(
        "{dialect} schema:\n{schema_text}\n\nUser question: {question}\n\n{INSTRUCTIONS}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_parts() {
        let prompt = build_prompt("TABLE t: id INTEGER PRIMARY KEY", "how many rows?", "sqlite");
        assert!(prompt.starts_with("sqlite schema:\nTABLE t: id INTEGER PRIMARY KEY"));
        assert!(prompt.contains("User question: how many rows?"));
        assert!(prompt.contains("Read-only queries only."));
        assert!(prompt.contains("COLLATE NOCASE"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt("TABLE t: id INTEGER", "q", "sqlite");
        let b = build_prompt("TABLE t: id INTEGER", "q", "sqlite");
        assert_eq!(a, b);
    }
}
