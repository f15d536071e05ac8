use anyhow::Result;
use tracing::info;

use crate::common::{EventId, UserId};
use crate::domains::user_events::models::UserEvent;
use crate::kernel::ServerDeps;

/// Associations of an event, through the reverse index
pub async fn list_event_registrations(
    event_id: EventId,
    role: Option<&str>,
    deps: &ServerDeps,
) -> Result<Vec<UserEvent>> {
    info!(event_id = %event_id, role = ?role, "Listing event registrations");
    deps.user_events().users_for_event(&event_id, role).await
}

/// Associations of a user
pub async fn list_user_registrations(
    user_id: UserId,
    role: Option<&str>,
    deps: &ServerDeps,
) -> Result<Vec<UserEvent>> {
    info!(user_id = %user_id, role = ?role, "Listing user registrations");
    deps.user_events().events_for_user(&user_id, role).await
}
