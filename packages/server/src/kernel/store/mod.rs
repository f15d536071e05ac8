//! Key-value table storage.
//!
//! Every logical table (Users, Events, UserEvents) is a collection of JSON
//! documents addressed by a primary key, with exact-match secondary indexes.
//! Backends implement [`BaseStore`] / [`BaseTable`]; repositories never see
//! which backend they run on.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use schema::{
    timestamp_now, IndexSchema, Item, PrimaryKey, Query, TableSchema, CITY_STATE_INDEX,
    COMPANY_INDEX, EMAIL_INDEX, EVENT_ID_INDEX, JOB_TITLE_INDEX, OWNER_ID_INDEX, SLUG_INDEX,
    UPDATED_AT,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait BaseTable: Send + Sync {
    fn schema(&self) -> &TableSchema;

    async fn get(&self, key: &PrimaryKey) -> StoreResult<Option<Item>>;

    /// Write a full item, replacing any item with the same key.
    async fn put(&self, item: Item) -> StoreResult<Item>;

    /// Merge `changes` into an existing item and stamp `updatedAt`.
    ///
    /// Returns `None` without writing when the key does not exist.
    async fn update(&self, key: &PrimaryKey, changes: Item) -> StoreResult<Option<Item>>;

    /// Returns whether an item was removed.
    async fn delete(&self, key: &PrimaryKey) -> StoreResult<bool>;

    /// Every item in the table, in insertion order.
    async fn scan(&self) -> StoreResult<Vec<Item>>;

    async fn query(&self, query: &Query) -> StoreResult<Vec<Item>>;
}

#[async_trait]
pub trait BaseStore: Send + Sync {
    fn table(&self, schema: TableSchema) -> Arc<dyn BaseTable>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> StoreResult<()>;
}

/// The three CRM tables, opened once at startup.
#[derive(Clone)]
pub struct Tables {
    pub users: Arc<dyn BaseTable>,
    pub events: Arc<dyn BaseTable>,
    pub user_events: Arc<dyn BaseTable>,
}

impl Tables {
    pub fn open(store: &dyn BaseStore, prefix: &str) -> Self {
        Self {
            users: store.table(TableSchema::users(prefix)),
            events: store.table(TableSchema::events(prefix)),
            user_events: store.table(TableSchema::user_events(prefix)),
        }
    }
}
