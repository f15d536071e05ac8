//! Event query actions

use anyhow::Result;
use tracing::info;

use crate::common::EventId;
use crate::domains::events::models::Event;
use crate::kernel::{KeyedRepository, ServerDeps};

pub async fn get_event(event_id: EventId, deps: &ServerDeps) -> Result<Option<Event>> {
    info!(event_id = %event_id, "Getting event");
    deps.events().get(&event_id).await
}

pub async fn get_event_by_slug(slug: &str, deps: &ServerDeps) -> Result<Option<Event>> {
    info!(slug = %slug, "Getting event by slug");
    deps.events().find_by_slug(slug).await
}

/// Every event, via a full table scan
pub async fn list_events(deps: &ServerDeps) -> Result<Vec<Event>> {
    info!("Listing events");
    deps.events().scan().await
}
