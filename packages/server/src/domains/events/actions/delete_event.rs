use anyhow::Result;
use tracing::info;

use crate::common::EventId;
use crate::kernel::{KeyedRepository, ServerDeps};

/// Delete an event by id. Associations referencing the event are left in place.
pub async fn delete_event(event_id: EventId, deps: &ServerDeps) -> Result<bool> {
    info!(event_id = %event_id, "Deleting event");
    deps.events().delete(&event_id).await
}
