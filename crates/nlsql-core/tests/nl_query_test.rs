//! End-to-end pipeline test over a sample database.
//!
//! Exercises every stage except the live model call: the model reply is a
//! canned fenced answer of the kind a chat model produces for the question
//! "total amount ordered by Alice".

use nlsql_core::extract::{ensure_read_only, extract_sql};
use nlsql_core::prompt::build_prompt;
use nlsql_core::schema::DbSchema;
use nlsql_core::summary::summarize;
use nlsql_core::{exec, PipelineError};

use rusqlite::Connection;
use serde_json::json;

fn sample_db(name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::remove_file(&path).ok();
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE customers (
             id INTEGER PRIMARY KEY,
             name TEXT NOT NULL,
             city TEXT
         );
         CREATE TABLE orders (
             id INTEGER PRIMARY KEY,
             customer_id INTEGER NOT NULL,
             amount REAL NOT NULL,
             order_date TEXT NOT NULL,
             FOREIGN KEY (customer_id) REFERENCES customers(id)
         );
         INSERT INTO customers (id, name, city) VALUES
             (1, 'Alice', 'London'),
             (2, 'Bob', 'Paris'),
             (3, 'Charlie', 'Berlin');
         INSERT INTO orders (id, customer_id, amount, order_date) VALUES
             (1, 1, 120.50, '2024-10-01'),
             (2, 1, 80.00, '2024-10-05'),
             (3, 2, 200.00, '2024-10-02'),
             (4, 3, 50.00, '2024-09-20');",
    )
    .unwrap();
    path
}

#[test]
fn aggregate_question_end_to_end() {
    let path = sample_db("nlsql_e2e_test.db");

    // Introspection feeds the prompt.
    let schema = DbSchema::introspect(&path).unwrap();
    let rendered = schema.render();
    assert!(rendered.contains("TABLE customers:"));
    assert!(rendered.contains("TABLE orders:"));

    let prompt = build_prompt(&rendered, "total amount ordered by Alice", "sqlite");
    assert!(prompt.contains("customer_id INTEGER"));

    // A typical fenced model reply with trailing explanation.
    let reply = "```sql\n\
                 SELECT SUM(o.amount) AS total_amount\n\
                 FROM orders o\n\
                 JOIN customers c ON c.id = o.customer_id\n\
                 WHERE LOWER(c.name) = LOWER('Alice');\n\
                 ```\n\
                 This sums every order placed by Alice.";

    let sql = extract_sql(reply).unwrap();
    assert!(sql.starts_with("SELECT SUM"));
    assert!(sql.ends_with(';'));
    assert!(!sql.contains("```"));
    ensure_read_only(&sql).unwrap();

    let result = exec::execute(&path, &sql).unwrap();
    assert_eq!(result.columns, vec!["total_amount"]);
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0][0], json!(200.5));

    let summary = summarize(&result, 20).unwrap();
    assert_eq!(summary, "| total_amount |\n| --- |\n| 200.5 |");

    std::fs::remove_file(path).ok();
}

#[test]
fn case_insensitive_comparison_matches_differently_cased_data() {
    let path = sample_db("nlsql_e2e_case_test.db");

    let sql = extract_sql("SELECT name FROM customers WHERE name = 'alice' COLLATE NOCASE").unwrap();
    let result = exec::execute(&path, &sql).unwrap();
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0][0], json!("Alice"));

    std::fs::remove_file(path).ok();
}

#[test]
fn refusal_reply_fails_before_touching_the_database() {
    let err = extract_sql("I cannot answer this.").unwrap_err();
    assert!(matches!(err, PipelineError::Extraction(_)));
}

#[test]
fn mutating_reply_is_rejected_by_the_guard() {
    let sql = extract_sql("```sql\nDELETE FROM orders;\n```").unwrap();
    let err = ensure_read_only(&sql).unwrap_err();
    match err {
        PipelineError::ForbiddenStatement(kind) => assert_eq!(kind, "delete"),
        other => panic!("unexpected error: {other:?}"),
    }
}
