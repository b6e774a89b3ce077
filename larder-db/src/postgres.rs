//! PostgreSQL client over a sqlx pool
//!
//! Rows travel as JSON on both sides:
//! - reads return `to_jsonb(t)`, so the column set comes from the table
//! - writes go through `jsonb_populate_record(NULL::table, $1)`, so each
//!   value is cast to its column's type by Postgres
//!
//! Identifiers are checked by [`Query::validate`] before they are spliced.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row as _};
use tracing::debug;

use crate::client::{
    enforce_single, value_text, ClientError, DataClient, Filter, Operation, Query, Row,
};

/// Postgres-backed [`DataClient`]
#[derive(Debug, Clone)]
pub struct PgClient {
    pool: PgPool,
}

impl PgClient {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool with at most `max_connections` connections.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, ClientError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn push_columns(builder: &mut QueryBuilder<'_, Postgres>, columns: &[String]) {
    let mut separated = builder.separated(", ");
    for column in columns {
        separated.push(column.as_str());
    }
}

fn push_where(builder: &mut QueryBuilder<'_, Postgres>, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        match filter {
            Filter::Eq { column, value } => {
                builder.push(format!("t.{}::text = ", column));
                builder.push_bind(value_text(value));
            }
            Filter::AnyIlike { columns, pattern } => {
                builder.push("(");
                for (j, column) in columns.iter().enumerate() {
                    if j > 0 {
                        builder.push(" OR ");
                    }
                    builder.push(format!("t.{} ILIKE ", column));
                    builder.push_bind(pattern.clone());
                }
                builder.push(")");
            }
        }
    }
}

/// Build the SQL for `query`. Expects `query.validate()` to have passed.
pub fn build_sql(query: &Query) -> QueryBuilder<'static, Postgres> {
    let table = query.table.as_str();
    let mut builder = QueryBuilder::new("");

    match &query.operation {
        Operation::Select => {
            builder.push(format!("SELECT to_jsonb(t) AS row FROM {} AS t", table));
            push_where(&mut builder, &query.filters);
        }
        Operation::Insert(row) => {
            let columns: Vec<String> = row.keys().cloned().collect();
            builder.push(format!("INSERT INTO {} AS t (", table));
            push_columns(&mut builder, &columns);
            builder.push(") SELECT ");
            push_columns(&mut builder, &columns);
            builder.push(format!(" FROM jsonb_populate_record(NULL::{}, ", table));
            builder.push_bind(Json(Value::Object(row.clone())));
            builder.push(")");
        }
        Operation::Update(row) => {
            let columns: Vec<String> = row.keys().cloned().collect();
            builder.push(format!("UPDATE {} AS t SET (", table));
            push_columns(&mut builder, &columns);
            builder.push(") = (SELECT ");
            push_columns(&mut builder, &columns);
            builder.push(format!(" FROM jsonb_populate_record(NULL::{}, ", table));
            builder.push_bind(Json(Value::Object(row.clone())));
            builder.push("))");
            push_where(&mut builder, &query.filters);
        }
        Operation::Delete => {
            builder.push(format!("DELETE FROM {} AS t", table));
            push_where(&mut builder, &query.filters);
        }
    }

    if !matches!(query.operation, Operation::Select) {
        builder.push(" RETURNING to_jsonb(t) AS row");
    }

    builder
}

#[async_trait]
impl DataClient for PgClient {
    async fn execute(&self, query: Query) -> Result<Vec<Row>, ClientError> {
        query.validate()?;

        let mut builder = build_sql(&query);
        debug!(table = %query.table, sql = builder.sql(), "Postgres query");

        let records = builder.build().fetch_all(&self.pool).await?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let Json(value): Json<Value> = record.try_get("row")?;
            match value {
                Value::Object(row) => rows.push(row),
                other => {
                    return Err(ClientError::Backend(format!(
                        "expected a row object, got {}",
                        other
                    )))
                }
            }
        }

        enforce_single(query.single, rows)
    }
}
