use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::common::{EventId, UserId};
use crate::kernel::store::{BaseTable, Item, PrimaryKey, Query, SLUG_INDEX};
use crate::kernel::{DocumentTable, KeyedRepository};

/// Event - something users host or attend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub venue: String,
    pub max_capacity: i64,
    pub owner_id: UserId,
    #[serde(default)]
    pub hosts: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_host(&self, user_id: &UserId) -> bool {
        self.hosts.contains(user_id)
    }
}

/// Repository over the Events table
#[derive(Clone)]
pub struct EventRepository {
    docs: DocumentTable<Event>,
}

impl EventRepository {
    pub fn new(table: Arc<dyn BaseTable>) -> Self {
        Self {
            docs: DocumentTable::new(table),
        }
    }

    /// Exact-match lookup through the slug index
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let matches = self.docs.query(&Query::on_index(SLUG_INDEX, slug)).await?;
        Ok(matches.into_iter().next())
    }
}

#[async_trait]
impl KeyedRepository for EventRepository {
    type Record = Event;
    type Key = EventId;

    async fn get(&self, id: &EventId) -> Result<Option<Event>> {
        self.docs.get(&PrimaryKey::single(id.as_key())).await
    }

    async fn create(&self, event: &Event) -> Result<Event> {
        self.docs.put(event).await
    }

    async fn update(&self, id: &EventId, changes: Item) -> Result<Option<Event>> {
        self.docs
            .update(&PrimaryKey::single(id.as_key()), changes)
            .await
    }

    async fn delete(&self, id: &EventId) -> Result<bool> {
        self.docs.delete(&PrimaryKey::single(id.as_key())).await
    }

    async fn scan(&self) -> Result<Vec<Event>> {
        self.docs.scan().await
    }
}
