//! PostgREST client (Supabase REST endpoint)
//!
//! Translates a [`Query`] into one HTTP request against
//! `{base_url}/rest/v1/{table}`:
//! - select: GET, insert: POST, update: PATCH, delete: DELETE
//! - `eq` filters become `column=eq.value`
//! - `or_ilike` becomes `or=(a.ilike."pattern",b.ilike."pattern")`
//! - writes ask for `Prefer: return=representation` so rows come back

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use tracing::debug;

use crate::client::{
    enforce_single, value_text, ClientError, DataClient, Filter, Operation, OperationKind, Query,
    Row,
};

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// REST client for a PostgREST / Supabase project
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client for the project at `base_url` (e.g.
    /// `https://xyz.supabase.co`).
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

/// Query-string parameters for `query`.
pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_owned(), "*".to_owned())];

    for filter in &query.filters {
        match filter {
            Filter::Eq { column, value } => {
                params.push((column.clone(), format!("eq.{}", value_text(value))));
            }
            Filter::AnyIlike { columns, pattern } => {
                let quoted = quote(pattern);
                let clauses: Vec<String> = columns
                    .iter()
                    .map(|column| format!("{}.ilike.{}", column, quoted))
                    .collect();
                params.push(("or".to_owned(), format!("({})", clauses.join(","))));
            }
        }
    }

    params
}

/// Double-quote a value for use inside a PostgREST logic tree, so commas,
/// parentheses and dots in it are not read as syntax.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Turn a failed response body into a [`ClientError::Api`].
fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => ClientError::Api {
            status,
            code: err.code,
            message: err
                .message
                .unwrap_or_else(|| format!("request failed with status {}", status)),
            details: err.details,
            hint: err.hint,
        },
        Err(_) => ClientError::Api {
            status,
            code: None,
            message: if body.trim().is_empty() {
                format!("request failed with status {}", status)
            } else {
                body.trim().to_owned()
            },
            details: None,
            hint: None,
        },
    }
}

#[async_trait]
impl DataClient for RestClient {
    async fn execute(&self, query: Query) -> Result<Vec<Row>, ClientError> {
        query.validate()?;

        let (method, body) = match &query.operation {
            Operation::Select => (Method::GET, None),
            Operation::Insert(row) => (Method::POST, Some(row)),
            Operation::Update(row) => (Method::PATCH, Some(row)),
            Operation::Delete => (Method::DELETE, None),
        };

        debug!(table = %query.table, method = %method, "PostgREST request");

        let mut request = self
            .client
            .request(method, self.table_url(&query.table))
            .query(&query_params(&query))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json");

        if query.kind() != OperationKind::Select {
            request = request.header("Prefer", "return=representation");
        }
        if let Some(row) = body {
            request = request.json(row);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }

        let rows: Vec<Row> = if text.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&text)?
        };

        enforce_single(query.single, rows)
    }
}
