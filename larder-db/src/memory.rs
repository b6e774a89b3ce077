//! In-process database client for tests and offline demos
//!
//! Keeps each table as a list of JSON rows, assigns uuid ids on insert,
//! evaluates `eq` and ILIKE filters the way Postgres does, and can be told
//! to fail the next matching operation.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::client::{
    enforce_single, value_text, ClientError, DataClient, Filter, Operation, OperationKind, Query,
    Row,
};

/// A failure queued with [`MemoryClient::fail_next`]
#[derive(Debug, Clone)]
struct ScriptedFailure {
    table: String,
    kind: OperationKind,
    message: String,
}

/// In-memory [`DataClient`]
#[derive(Debug, Default)]
pub struct MemoryClient {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    failures: Mutex<VecDeque<ScriptedFailure>>,
    round_trips: AtomicUsize,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `kind` operation on `table` fail with `message`.
    pub fn fail_next(&self, table: &str, kind: OperationKind, message: &str) {
        self.failures.lock().unwrap().push_back(ScriptedFailure {
            table: table.to_owned(),
            kind,
            message: message.to_owned(),
        });
    }

    /// Number of queries executed so far.
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// Snapshot of a table without counting a round trip.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Put a row straight into a table, bypassing the query path.
    pub fn seed(&self, table: &str, row: Row) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_owned())
            .or_default()
            .push(row);
    }

    fn take_failure(&self, table: &str, kind: OperationKind) -> Option<ScriptedFailure> {
        let mut failures = self.failures.lock().unwrap();
        let pos = failures
            .iter()
            .position(|f| f.table == table && f.kind == kind)?;
        failures.remove(pos)
    }

    fn run(&self, query: Query) -> Result<Vec<Row>, ClientError> {
        let matchers = query
            .filters
            .iter()
            .map(Matcher::new)
            .collect::<Result<Vec<_>, _>>()?;
        let matches = |row: &Row| matchers.iter().all(|m| m.matches(row));

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(query.table.clone()).or_default();

        match query.operation {
            Operation::Select => Ok(rows.iter().filter(|r| matches(*r)).cloned().collect()),
            Operation::Insert(mut row) => {
                let id = match row.get("id") {
                    Some(id) => value_text(id),
                    None => uuid::Uuid::new_v4().to_string(),
                };
                if rows
                    .iter()
                    .any(|r| r.get("id").map(value_text).as_deref() == Some(id.as_str()))
                {
                    return Err(ClientError::Api {
                        status: 409,
                        code: Some("23505".to_string()),
                        message: format!(
                            "duplicate key value violates unique constraint \"{}_pkey\"",
                            query.table
                        ),
                        details: None,
                        hint: None,
                    });
                }
                row.insert("id".to_owned(), Value::String(id));
                rows.push(row.clone());
                Ok(vec![row])
            }
            Operation::Update(changes) => {
                let mut updated = Vec::new();
                for row in rows.iter_mut().filter(|r| matches(&**r)) {
                    for (column, value) in &changes {
                        row.insert(column.clone(), value.clone());
                    }
                    updated.push(row.clone());
                }
                Ok(updated)
            }
            Operation::Delete => {
                let (removed, kept): (Vec<Row>, Vec<Row>) =
                    rows.drain(..).partition(|r| matches(r));
                *rows = kept;
                Ok(removed)
            }
        }
    }
}

#[async_trait]
impl DataClient for MemoryClient {
    async fn execute(&self, query: Query) -> Result<Vec<Row>, ClientError> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        query.validate()?;

        if let Some(failure) = self.take_failure(&query.table, query.kind()) {
            return Err(ClientError::Backend(failure.message));
        }

        let single = query.single;
        let rows = self.run(query)?;
        enforce_single(single, rows)
    }
}

/// A compiled [`Filter`]
enum Matcher<'a> {
    Eq { column: &'a str, text: String },
    AnyIlike { columns: &'a [String], regex: Regex },
}

impl<'a> Matcher<'a> {
    fn new(filter: &'a Filter) -> Result<Self, ClientError> {
        Ok(match filter {
            Filter::Eq { column, value } => Matcher::Eq {
                column,
                text: value_text(value),
            },
            Filter::AnyIlike { columns, pattern } => Matcher::AnyIlike {
                columns,
                regex: ilike_regex(pattern)?,
            },
        })
    }

    fn matches(&self, row: &Row) -> bool {
        match self {
            Matcher::Eq { column, text } => row
                .get(*column)
                .map_or(false, |v| !v.is_null() && value_text(v) == *text),
            Matcher::AnyIlike { columns, regex } => columns.iter().any(|column| {
                row.get(column)
                    .and_then(Value::as_str)
                    .map_or(false, |s| regex.is_match(s))
            }),
        }
    }
}

/// Translate an ILIKE pattern (`%`, `_`, backslash escapes) to a regex.
fn ilike_regex(pattern: &str) -> Result<Regex, ClientError> {
    let mut re = String::from("^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    re.push_str(&regex::escape(&escaped.to_string()));
                }
            }
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');

    RegexBuilder::new(&re)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| ClientError::InvalidQuery(format!("bad pattern '{}': {}", pattern, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::contains_pattern;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    #[test]
    fn ilike_semantics() {
        let re = ilike_regex("%pasta%").unwrap();
        assert!(re.is_match("Fresh PASTA daily"));
        assert!(!re.is_match("bread"));

        let re = ilike_regex("a_c").unwrap();
        assert!(re.is_match("abc"));
        assert!(!re.is_match("abbc"));

        let re = ilike_regex(&contains_pattern("100%")).unwrap();
        assert!(re.is_match("now 100% butter"));
        assert!(!re.is_match("now 1000 butter"));
    }

    #[tokio::test]
    async fn insert_assigns_id_and_counts_round_trips() {
        let client = MemoryClient::new();
        let rows = client
            .execute(Query::insert("influencers", row(json!({"name": "Chef A"}))).single())
            .await
            .unwrap();

        let id = rows[0]["id"].as_str().unwrap().to_owned();
        assert_eq!(id.len(), 36);
        assert_eq!(client.rows("influencers").len(), 1);
        assert_eq!(client.round_trips(), 1);

        let found = client
            .fetch_one(Query::select("influencers").eq("id", id.as_str()))
            .await
            .unwrap();
        assert_eq!(found["name"], "Chef A");
        assert_eq!(client.round_trips(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_return_touched_rows() {
        let client = MemoryClient::new();
        client.seed("recipes", row(json!({"id": "1", "title": "Soup"})));
        client.seed("recipes", row(json!({"id": "2", "title": "Stew"})));

        let updated = client
            .execute(Query::update("recipes", row(json!({"title": "Broth"}))).eq("id", "1"))
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["title"], "Broth");

        let deleted = client
            .execute(Query::delete("recipes").eq("id", "2"))
            .await
            .unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(client.rows("recipes").len(), 1);

        let none = client
            .execute(Query::delete("recipes").eq("id", "missing"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let client = MemoryClient::new();
        client.seed("recipes", row(json!({"id": "1"})));
        let err = client
            .execute(Query::insert("recipes", row(json!({"id": "1", "title": "x"}))))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 409, .. }));
    }

    #[tokio::test]
    async fn scripted_failure_fires_once() {
        let client = MemoryClient::new();
        client.fail_next("recipes", OperationKind::Select, "connection reset");

        let err = client.execute(Query::select("recipes")).await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
        assert!(client.execute(Query::select("recipes")).await.is_ok());
    }

    #[tokio::test]
    async fn single_on_missing_row() {
        let client = MemoryClient::new();
        let err = client
            .fetch_one(Query::select("recipes").eq("id", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotSingle { count: 0 }));
    }
}
