use anyhow::Result;
use tracing::{debug, info};

use crate::common::EventId;
use crate::domains::events::data::UpdateEventInput;
use crate::domains::events::models::Event;
use crate::kernel::{KeyedRepository, ServerDeps};

/// Apply a partial update. Returns `None` when the event does not exist.
///
/// Slug uniqueness and owner-in-hosts are not re-checked here.
pub async fn update_event(
    event_id: EventId,
    input: UpdateEventInput,
    deps: &ServerDeps,
) -> Result<Option<Event>> {
    info!(event_id = %event_id, "Updating event");

    let events = deps.events();
    let changes = input.into_changes()?;
    if changes.is_empty() {
        debug!(event_id = %event_id, "Empty update, returning current state");
        return events.get(&event_id).await;
    }

    events.update(&event_id, changes).await
}
