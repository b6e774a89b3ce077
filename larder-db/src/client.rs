//! Query-builder style database boundary
//!
//! A [`Query`] names one table, one operation and its filters. Executing it
//! is always exactly one round trip; insert, update and delete return the
//! rows they touched. `single()` asks the client to fail unless exactly one
//! row comes back.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub use larder_core::Row;

/// Table and column names that may be spliced into a request
static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("invalid identifier regex"));

/// Errors raised by a database client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Error body returned by the database service
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    #[error("expected a single row, got {count}")]
    NotSingle { count: usize },

    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Failure reported by a backend without a richer error type
    #[error("{0}")]
    Backend(String),
}

/// Row filter. Multiple filters on one query are AND-ed.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: Value },
    /// `a ILIKE pattern OR b ILIKE pattern ...`
    AnyIlike { columns: Vec<String>, pattern: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Select,
    Insert(Row),
    Update(Row),
    Delete,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Select => OperationKind::Select,
            Self::Insert(_) => OperationKind::Insert,
            Self::Update(_) => OperationKind::Update,
            Self::Delete => OperationKind::Delete,
        }
    }
}

/// One request against one table
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub operation: Operation,
    pub filters: Vec<Filter>,
    pub single: bool,
}

impl Query {
    fn new(table: &str, operation: Operation) -> Self {
        Self {
            table: table.to_owned(),
            operation,
            filters: Vec::new(),
            single: false,
        }
    }

    pub fn select(table: &str) -> Self {
        Self::new(table, Operation::Select)
    }

    pub fn insert(table: &str, row: Row) -> Self {
        Self::new(table, Operation::Insert(row))
    }

    pub fn update(table: &str, row: Row) -> Self {
        Self::new(table, Operation::Update(row))
    }

    pub fn delete(table: &str) -> Self {
        Self::new(table, Operation::Delete)
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_owned(),
            value: value.into(),
        });
        self
    }

    /// Match rows where any of `columns` matches the ILIKE `pattern`.
    pub fn or_ilike(mut self, columns: &[&str], pattern: impl Into<String>) -> Self {
        self.filters.push(Filter::AnyIlike {
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
            pattern: pattern.into(),
        });
        self
    }

    /// Require exactly one row in the result.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }

    /// Reject queries no backend should run: bad identifiers, empty writes,
    /// or writes that try to change `id`.
    pub fn validate(&self) -> Result<(), ClientError> {
        check_identifier(&self.table)?;

        for filter in &self.filters {
            match filter {
                Filter::Eq { column, .. } => check_identifier(column)?,
                Filter::AnyIlike { columns, .. } => {
                    if columns.is_empty() {
                        return Err(ClientError::InvalidQuery(
                            "or filter needs at least one column".to_string(),
                        ));
                    }
                    for column in columns {
                        check_identifier(column)?;
                    }
                }
            }
        }

        match &self.operation {
            Operation::Insert(row) | Operation::Update(row) if row.is_empty() => Err(
                ClientError::InvalidQuery(format!("no columns to write on {}", self.table)),
            ),
            Operation::Update(row) if row.contains_key("id") => Err(ClientError::InvalidQuery(
                "id cannot be changed".to_string(),
            )),
            Operation::Insert(row) | Operation::Update(row) => {
                row.keys().try_for_each(|column| check_identifier(column))
            }
            Operation::Select | Operation::Delete => Ok(()),
        }
    }
}

pub fn check_identifier(name: &str) -> Result<(), ClientError> {
    if IDENT_RE.is_match(name) {
        Ok(())
    } else {
        Err(ClientError::InvalidIdentifier(name.to_owned()))
    }
}

/// ILIKE pattern matching `text` anywhere, with LIKE metacharacters in
/// `text` taken literally.
pub fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Apply the `single()` contract to a result set.
pub fn enforce_single(single: bool, rows: Vec<Row>) -> Result<Vec<Row>, ClientError> {
    if single && rows.len() != 1 {
        return Err(ClientError::NotSingle { count: rows.len() });
    }
    Ok(rows)
}

/// Text form of a filter value, as compared against a column.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Database client (testable)
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Run one query in a single round trip and return the selected or
    /// affected rows.
    async fn execute(&self, query: Query) -> Result<Vec<Row>, ClientError>;

    /// Run `query` with `single()` set and return its one row.
    async fn fetch_one(&self, query: Query) -> Result<Row, ClientError> {
        self.execute(query.single())
            .await?
            .into_iter()
            .next()
            .ok_or(ClientError::NotSingle { count: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn builder_collects_filters() {
        let query = Query::select("influencers")
            .eq("id", "abc")
            .or_ilike(&["name", "bio"], "%x%")
            .single();

        assert_eq!(query.kind(), OperationKind::Select);
        assert!(query.single);
        assert_eq!(query.filters.len(), 2);
        assert_eq!(
            query.filters[0],
            Filter::Eq {
                column: "id".into(),
                value: json!("abc")
            }
        );
        assert!(query.validate().is_ok());
    }

    #[test]
    fn rejects_injected_identifiers() {
        let query = Query::select("influencers; drop table recipes");
        assert!(matches!(
            query.validate(),
            Err(ClientError::InvalidIdentifier(_))
        ));

        let query = Query::select("recipes").eq("title OR 1=1", "x");
        assert!(matches!(
            query.validate(),
            Err(ClientError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn rejects_empty_and_id_writes() {
        let empty = Query::update("recipes", Row::new()).eq("id", "1");
        assert!(matches!(empty.validate(), Err(ClientError::InvalidQuery(_))));

        let id_change = Query::update("recipes", row(&[("id", json!("2"))])).eq("id", "1");
        assert!(matches!(
            id_change.validate(),
            Err(ClientError::InvalidQuery(_))
        ));

        let insert_with_id = Query::insert("recipes", row(&[("id", json!("2"))]));
        assert!(insert_with_id.validate().is_ok());
    }

    #[test]
    fn contains_pattern_escapes_metacharacters() {
        assert_eq!(contains_pattern("pasta"), "%pasta%");
        assert_eq!(contains_pattern(""), "%%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn single_contract() {
        assert!(enforce_single(false, vec![]).is_ok());
        assert!(matches!(
            enforce_single(true, vec![]),
            Err(ClientError::NotSingle { count: 0 })
        ));
        assert!(matches!(
            enforce_single(true, vec![Row::new(), Row::new()]),
            Err(ClientError::NotSingle { count: 2 })
        ));
        assert_eq!(enforce_single(true, vec![Row::new()]).unwrap().len(), 1);
    }

    #[test]
    fn value_text_unquotes_strings() {
        assert_eq!(value_text(&json!("abc")), "abc");
        assert_eq!(value_text(&json!(42)), "42");
    }
}
