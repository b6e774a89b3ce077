//! Generic service over one [`Entity`] table

use std::marker::PhantomData;
use std::sync::Arc;

use larder_core::{Entity, Row};
use serde_json::Value;
use tracing::{debug, info};

use super::DbError;
use crate::client::{contains_pattern, ClientError, DataClient, Query};

/// CRUD + search over the table behind `E`.
///
/// Built from an explicit client handle; cloning shares the handle.
pub struct EntityService<E> {
    client: Arc<dyn DataClient>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    pub(crate) fn client(&self) -> &dyn DataClient {
        self.client.as_ref()
    }

    pub(crate) fn decode(row: Row) -> Result<E, DbError> {
        let stored = serde_json::from_value(Value::Object(row)).map_err(|source| {
            DbError::Decode {
                resource: E::NOUN,
                source,
            }
        })?;
        Ok(E::to_domain(stored))
    }

    pub(crate) fn decode_all(rows: Vec<Row>) -> Result<Vec<E>, DbError> {
        rows.into_iter().map(Self::decode).collect()
    }

    /// Every record in the table; empty table gives an empty vec.
    pub async fn get_all(&self) -> Result<Vec<E>, DbError> {
        debug!(table = E::TABLE, "get_all");
        let rows = self.client.execute(Query::select(E::TABLE)).await?;
        Self::decode_all(rows)
    }

    /// The record with exactly this id.
    pub async fn get_by_id(&self, id: &str) -> Result<E, DbError> {
        debug!(table = E::TABLE, id, "get_by_id");
        let row = self
            .client
            .fetch_one(Query::select(E::TABLE).eq("id", id))
            .await
            .map_err(|err| match err {
                ClientError::NotSingle { count: 0 } => DbError::NotFound {
                    resource: E::NOUN,
                    id: id.to_owned(),
                },
                other => other.into(),
            })?;
        Self::decode(row)
    }

    /// Insert a new record and return it as stored (with its id).
    pub async fn create(&self, data: &E::New) -> Result<E, DbError> {
        let row = self
            .client
            .fetch_one(Query::insert(E::TABLE, E::insert_columns(data)))
            .await
            .map_err(|err| Self::write_error(err, "create"))?;
        let created = Self::decode(row)?;
        info!(table = E::TABLE, id = created.id(), "Created {}", E::NOUN);
        Ok(created)
    }

    /// Change exactly the fields set in `patch`.
    ///
    /// An empty patch writes nothing and returns the current record.
    pub async fn update(&self, id: &str, patch: &E::Patch) -> Result<E, DbError> {
        let columns = E::patch_columns(patch);
        if columns.is_empty() {
            debug!(table = E::TABLE, id, "Empty patch, reading current record");
            return self.get_by_id(id).await;
        }

        let row = self
            .client
            .fetch_one(Query::update(E::TABLE, columns).eq("id", id))
            .await
            .map_err(|err| Self::write_error(err, "update"))?;
        let updated = Self::decode(row)?;
        info!(table = E::TABLE, id, "Updated {}", E::NOUN);
        Ok(updated)
    }

    /// Remove the record with this id. Removing a missing id is not an error.
    pub async fn delete(&self, id: &str) -> Result<(), DbError> {
        self.client
            .execute(Query::delete(E::TABLE).eq("id", id))
            .await?;
        info!(table = E::TABLE, id, "Deleted {}", E::NOUN);
        Ok(())
    }

    /// Case-insensitive substring match over the entity's search columns.
    /// An empty query matches every record.
    pub async fn search(&self, query: &str) -> Result<Vec<E>, DbError> {
        debug!(table = E::TABLE, query, "search");
        let rows = self
            .client
            .execute(Query::select(E::TABLE).or_ilike(E::SEARCH_COLUMNS, contains_pattern(query)))
            .await?;
        Self::decode_all(rows)
    }

    fn write_error(err: ClientError, action: &'static str) -> DbError {
        match err {
            ClientError::NotSingle { count: 0 } => DbError::Write {
                resource: E::NOUN,
                action,
            },
            other => other.into(),
        }
    }
}
