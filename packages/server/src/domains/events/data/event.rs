use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{deserialize_nullable, EventId, UserId};
use crate::domains::events::models::Event;
use crate::kernel::repository::to_item;
use crate::kernel::store::Item;

/// Input for creating an event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub venue: String,
    pub max_capacity: i64,
    pub owner_id: UserId,
    #[serde(default)]
    pub hosts: Vec<UserId>,
}

impl CreateEventInput {
    /// Build the stored event. The owner is always one of the hosts.
    pub fn into_event(self) -> Event {
        let mut hosts = self.hosts;
        if !hosts.contains(&self.owner_id) {
            hosts.push(self.owner_id);
        }

        let now = Utc::now();
        Event {
            id: EventId::new(),
            slug: self.slug,
            title: self.title,
            description: self.description,
            start_at: self.start_at,
            end_at: self.end_at,
            venue: self.venue,
            max_capacity: self.max_capacity,
            owner_id: self.owner_id,
            hosts,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for an event. Only fields present in the request are written;
/// an explicit `null` clears the description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<UserId>>,
}

impl UpdateEventInput {
    pub fn into_changes(self) -> Result<Item> {
        to_item(&self)
    }
}

/// Outcome of auto-registering the owner as a host after the event was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OwnerRegistration {
    Registered,
    Failed { error: String },
}

impl OwnerRegistration {
    pub fn is_registered(&self) -> bool {
        matches!(self, OwnerRegistration::Registered)
    }
}

/// A created event together with the result of the owner registration step
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub owner_registration: OwnerRegistration,
}
