//! In-process table storage.
//!
//! Used by the test suite and by local runs without `DATABASE_URL`. Tables
//! opened under the same name share rows, so every handle handed out by one
//! `MemoryStore` sees the same data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::RwLock;

use super::schema::{timestamp_now, Item, PrimaryKey, Query, TableSchema, UPDATED_AT};
use super::{BaseStore, BaseTable, StoreResult};

type Rows = Arc<RwLock<IndexMap<PrimaryKey, Item>>>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<HashMap<String, Rows>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, schema: TableSchema) -> MemoryTable {
        let rows = {
            let mut tables = self.tables.lock().unwrap_or_else(|p| p.into_inner());
            tables.entry(schema.name.clone()).or_default().clone()
        };
        MemoryTable { schema, rows }
    }
}

#[async_trait]
impl BaseStore for MemoryStore {
    fn table(&self, schema: TableSchema) -> Arc<dyn BaseTable> {
        Arc::new(self.open(schema))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

pub struct MemoryTable {
    schema: TableSchema,
    rows: Rows,
}

#[async_trait]
impl BaseTable for MemoryTable {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    async fn get(&self, key: &PrimaryKey) -> StoreResult<Option<Item>> {
        self.schema.check_key(key)?;
        Ok(self.rows.read().await.get(key).cloned())
    }

    async fn put(&self, item: Item) -> StoreResult<Item> {
        let key = self.schema.key_of(&item)?;
        self.rows.write().await.insert(key, item.clone());
        Ok(item)
    }

    async fn update(&self, key: &PrimaryKey, changes: Item) -> StoreResult<Option<Item>> {
        self.schema.check_key(key)?;
        self.schema.check_changes(&changes)?;

        let mut rows = self.rows.write().await;
        let Some(existing) = rows.get_mut(key) else {
            return Ok(None);
        };
        existing.extend(changes);
        existing.insert(UPDATED_AT.to_string(), Value::String(timestamp_now()));
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, key: &PrimaryKey) -> StoreResult<bool> {
        self.schema.check_key(key)?;
        Ok(self.rows.write().await.shift_remove(key).is_some())
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn query(&self, query: &Query) -> StoreResult<Vec<Item>> {
        let (hash_attr, range_attr) = query.key_attrs(&self.schema)?;
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|item| query.matches(hash_attr, range_attr, item))
            .cloned()
            .collect())
    }
}
