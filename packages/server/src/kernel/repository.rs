//! Repository contracts over the table storage.
//!
//! Entities with their own id (User, Event) implement [`KeyedRepository`].
//! The UserEvent association is addressed by (userId, eventId) and implements
//! [`CompositeKeyRepository`] instead; it has no single-id operations to call.

use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::kernel::store::{BaseTable, Item, PrimaryKey, Query};

#[async_trait]
pub trait KeyedRepository: Send + Sync {
    type Record: Send + Sync;
    type Key: Send + Sync;

    async fn get(&self, id: &Self::Key) -> Result<Option<Self::Record>>;
    async fn create(&self, record: &Self::Record) -> Result<Self::Record>;
    /// Partial update; `changes` holds only the attributes to overwrite.
    async fn update(&self, id: &Self::Key, changes: Item) -> Result<Option<Self::Record>>;
    async fn delete(&self, id: &Self::Key) -> Result<bool>;
    /// Full table scan.
    async fn scan(&self) -> Result<Vec<Self::Record>>;
}

#[async_trait]
pub trait CompositeKeyRepository: Send + Sync {
    type Record: Send + Sync;
    type HashKey: Send + Sync;
    type RangeKey: Send + Sync;

    async fn get(&self, hash: &Self::HashKey, range: &Self::RangeKey)
        -> Result<Option<Self::Record>>;
    async fn create(&self, record: &Self::Record) -> Result<Self::Record>;
    async fn update(
        &self,
        hash: &Self::HashKey,
        range: &Self::RangeKey,
        changes: Item,
    ) -> Result<Option<Self::Record>>;
    async fn delete(&self, hash: &Self::HashKey, range: &Self::RangeKey) -> Result<bool>;
    async fn scan(&self) -> Result<Vec<Self::Record>>;
}

/// Typed view over a table: converts records to and from storage items.
pub struct DocumentTable<R> {
    table: Arc<dyn BaseTable>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for DocumentTable<R> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> DocumentTable<R>
where
    R: Serialize + DeserializeOwned,
{
    pub fn new(table: Arc<dyn BaseTable>) -> Self {
        Self {
            table,
            _record: PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table.schema().name
    }

    pub async fn get(&self, key: &PrimaryKey) -> Result<Option<R>> {
        self.table
            .get(key)
            .await?
            .map(|item| self.decode(item))
            .transpose()
    }

    pub async fn put(&self, record: &R) -> Result<R> {
        let stored = self.table.put(to_item(record)?).await?;
        self.decode(stored)
    }

    pub async fn update(&self, key: &PrimaryKey, changes: Item) -> Result<Option<R>> {
        self.table
            .update(key, changes)
            .await?
            .map(|item| self.decode(item))
            .transpose()
    }

    pub async fn delete(&self, key: &PrimaryKey) -> Result<bool> {
        Ok(self.table.delete(key).await?)
    }

    pub async fn scan(&self) -> Result<Vec<R>> {
        self.decode_all(self.table.scan().await?)
    }

    pub async fn query(&self, query: &Query) -> Result<Vec<R>> {
        self.decode_all(self.table.query(query).await?)
    }

    fn decode(&self, item: Item) -> Result<R> {
        serde_json::from_value(serde_json::Value::Object(item))
            .with_context(|| format!("Malformed item in table {}", self.table_name()))
    }

    fn decode_all(&self, items: Vec<Item>) -> Result<Vec<R>> {
        items.into_iter().map(|item| self.decode(item)).collect()
    }
}

/// Serialize a record into a storage item. Records must serialize to objects.
pub fn to_item<R: Serialize>(record: &R) -> Result<Item> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(item) => Ok(item),
        other => anyhow::bail!("Expected a JSON object, got {}", other),
    }
}
