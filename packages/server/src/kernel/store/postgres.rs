//! PostgreSQL table storage.
//!
//! All logical tables live in one `crm_items` table: one row per item, keyed
//! by `(table_name, hash_key, range_key)`, with the item itself in a JSONB
//! `doc` column. Single-key tables store `''` as `range_key`. Secondary
//! indexes are expression indexes on `doc ->> '<attribute>'` (see
//! `migrations/`).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::schema::{timestamp_now, Item, PrimaryKey, Query, TableSchema, UPDATED_AT};
use super::{BaseStore, BaseTable, StoreResult};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn open(&self, schema: TableSchema) -> PgTable {
        PgTable {
            pool: self.pool.clone(),
            schema,
        }
    }
}

#[async_trait]
impl BaseStore for PgStore {
    fn table(&self, schema: TableSchema) -> Arc<dyn BaseTable> {
        Arc::new(self.open(schema))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub struct PgTable {
    pool: PgPool,
    schema: TableSchema,
}

fn range_column(key: &PrimaryKey) -> &str {
    key.range.as_deref().unwrap_or("")
}

#[async_trait]
impl BaseTable for PgTable {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    async fn get(&self, key: &PrimaryKey) -> StoreResult<Option<Item>> {
        self.schema.check_key(key)?;

        let doc = sqlx::query_scalar::<_, Json<Item>>(
            "SELECT doc FROM crm_items
             WHERE table_name = $1 AND hash_key = $2 AND range_key = $3",
        )
        .bind(&self.schema.name)
        .bind(&key.hash)
        .bind(range_column(key))
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc.map(|Json(item)| item))
    }

    async fn put(&self, item: Item) -> StoreResult<Item> {
        let key = self.schema.key_of(&item)?;

        let Json(stored) = sqlx::query_scalar::<_, Json<Item>>(
            "INSERT INTO crm_items (table_name, hash_key, range_key, doc)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (table_name, hash_key, range_key)
             DO UPDATE SET doc = EXCLUDED.doc
             RETURNING doc",
        )
        .bind(&self.schema.name)
        .bind(&key.hash)
        .bind(range_column(&key))
        .bind(Json(&item))
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn update(&self, key: &PrimaryKey, mut changes: Item) -> StoreResult<Option<Item>> {
        self.schema.check_key(key)?;
        self.schema.check_changes(&changes)?;
        changes.insert(UPDATED_AT.to_string(), Value::String(timestamp_now()));

        // `||` on jsonb objects is a shallow merge, right side wins.
        let doc = sqlx::query_scalar::<_, Json<Item>>(
            "UPDATE crm_items SET doc = doc || $4
             WHERE table_name = $1 AND hash_key = $2 AND range_key = $3
             RETURNING doc",
        )
        .bind(&self.schema.name)
        .bind(&key.hash)
        .bind(range_column(key))
        .bind(Json(&changes))
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc.map(|Json(item)| item))
    }

    async fn delete(&self, key: &PrimaryKey) -> StoreResult<bool> {
        self.schema.check_key(key)?;

        let result = sqlx::query(
            "DELETE FROM crm_items
             WHERE table_name = $1 AND hash_key = $2 AND range_key = $3",
        )
        .bind(&self.schema.name)
        .bind(&key.hash)
        .bind(range_column(key))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        let docs = sqlx::query_scalar::<_, Json<Item>>(
            "SELECT doc FROM crm_items WHERE table_name = $1 ORDER BY seq",
        )
        .bind(&self.schema.name)
        .fetch_all(&self.pool)
        .await?;

        Ok(docs.into_iter().map(|Json(item)| item).collect())
    }

    async fn query(&self, query: &Query) -> StoreResult<Vec<Item>> {
        let (hash_attr, range_attr) = query.key_attrs(&self.schema)?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT doc FROM crm_items WHERE table_name = ");
        builder.push_bind(&self.schema.name);

        match query.index {
            None => {
                builder.push(" AND hash_key = ").push_bind(&query.hash);
                if let Some(range) = &query.range {
                    builder.push(" AND range_key = ").push_bind(range);
                }
            }
            Some(_) => {
                // Attribute names come from the static schema, never from input,
                // and are inlined so the expression indexes apply.
                builder
                    .push(format!(" AND doc ->> '{}' = ", hash_attr))
                    .push_bind(&query.hash);
                if let (Some(attr), Some(range)) = (range_attr, &query.range) {
                    builder
                        .push(format!(" AND doc ->> '{}' = ", attr))
                        .push_bind(range);
                }
            }
        }

        if let Some((attribute, value)) = &query.filter {
            builder
                .push(" AND doc -> ")
                .push_bind(attribute)
                .push(" = ")
                .push_bind(Json(value));
        }
        builder.push(" ORDER BY seq");

        let docs = builder
            .build_query_scalar::<Json<Item>>()
            .fetch_all(&self.pool)
            .await?;

        Ok(docs.into_iter().map(|Json(item)| item).collect())
    }
}
