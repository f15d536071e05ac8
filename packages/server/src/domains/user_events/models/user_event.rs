use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::common::{EventId, UserId};
use crate::kernel::store::{BaseTable, Item, PrimaryKey, Query, EVENT_ID_INDEX};
use crate::kernel::{CompositeKeyRepository, DocumentTable};

pub const ROLE_HOST: &str = "host";
pub const ROLE_PARTICIPANT: &str = "participant";

/// UserEvent - links one user to one event with a role.
///
/// Identified by (userId, eventId) only. Writing the same pair again replaces
/// the existing association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    pub user_id: UserId,
    pub event_id: EventId,
    pub role: String,
    #[serde(alias = "createdAt")]
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEvent {
    pub fn new(user_id: UserId, event_id: EventId, role: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            event_id,
            role: role.into(),
            registered_at: now,
            updated_at: now,
        }
    }

    pub fn is_host(&self) -> bool {
        self.role == ROLE_HOST
    }

    pub fn is_participant(&self) -> bool {
        self.role == ROLE_PARTICIPANT
    }
}

/// Hosted and attended association counts for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub hosted: usize,
    pub attended: usize,
}

fn key(user_id: &UserId, event_id: &EventId) -> PrimaryKey {
    PrimaryKey::composite(user_id.as_key(), event_id.as_key())
}

/// Repository over the UserEvents table
#[derive(Clone)]
pub struct UserEventRepository {
    docs: DocumentTable<UserEvent>,
}

impl UserEventRepository {
    pub fn new(table: Arc<dyn BaseTable>) -> Self {
        Self {
            docs: DocumentTable::new(table),
        }
    }

    /// Associations of one user, optionally restricted to a role
    pub async fn events_for_user(
        &self,
        user_id: &UserId,
        role: Option<&str>,
    ) -> Result<Vec<UserEvent>> {
        let mut query = Query::primary(user_id.as_key());
        if let Some(role) = role {
            query = query.filter_eq("role", role);
        }
        self.docs.query(&query).await
    }

    /// Associations of one event through the reverse index, optionally restricted to a role
    pub async fn users_for_event(
        &self,
        event_id: &EventId,
        role: Option<&str>,
    ) -> Result<Vec<UserEvent>> {
        let mut query = Query::on_index(EVENT_ID_INDEX, event_id.as_key());
        if let Some(role) = role {
            query = query.filter_eq("role", role);
        }
        self.docs.query(&query).await
    }

    /// Hosted and attended counts from a single lookup on the user's associations
    pub async fn event_counts(&self, user_id: &UserId) -> Result<EventCounts> {
        let associations = self.events_for_user(user_id, None).await?;
        Ok(EventCounts {
            hosted: associations.iter().filter(|a| a.is_host()).count(),
            attended: associations.iter().filter(|a| a.is_participant()).count(),
        })
    }
}

#[async_trait]
impl CompositeKeyRepository for UserEventRepository {
    type Record = UserEvent;
    type HashKey = UserId;
    type RangeKey = EventId;

    async fn get(&self, user_id: &UserId, event_id: &EventId) -> Result<Option<UserEvent>> {
        self.docs.get(&key(user_id, event_id)).await
    }

    async fn create(&self, association: &UserEvent) -> Result<UserEvent> {
        self.docs.put(association).await
    }

    async fn update(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        changes: Item,
    ) -> Result<Option<UserEvent>> {
        self.docs.update(&key(user_id, event_id), changes).await
    }

    async fn delete(&self, user_id: &UserId, event_id: &EventId) -> Result<bool> {
        self.docs.delete(&key(user_id, event_id)).await
    }

    async fn scan(&self) -> Result<Vec<UserEvent>> {
        self.docs.scan().await
    }
}
