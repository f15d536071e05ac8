use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info};

use crate::common::{CrmError, EventId, UserId};
use crate::domains::user_events::models::UserEvent;
use crate::kernel::store::Item;
use crate::kernel::{CompositeKeyRepository, KeyedRepository, ServerDeps};

/// Register a user with an event under `role`.
///
/// Both the event and the user must exist. Registering an already associated
/// pair changes its role and keeps the original `registeredAt`.
pub async fn register_user_for_event(
    event_id: EventId,
    user_id: UserId,
    role: &str,
    deps: &ServerDeps,
) -> Result<UserEvent> {
    info!(event_id = %event_id, user_id = %user_id, role = %role, "Registering user for event");

    let role = role.trim();
    if role.is_empty() {
        return Err(CrmError::bad_request("role must not be empty").into());
    }
    if deps.events().get(&event_id).await?.is_none() {
        return Err(CrmError::NotFound("Event".to_string()).into());
    }
    if deps.users().get(&user_id).await?.is_none() {
        return Err(CrmError::NotFound("User".to_string()).into());
    }

    let user_events = deps.user_events();
    if user_events.get(&user_id, &event_id).await?.is_some() {
        debug!(event_id = %event_id, user_id = %user_id, "Already registered, updating role");
        let mut changes = Item::new();
        changes.insert("role".to_string(), Value::String(role.to_string()));
        if let Some(updated) = user_events.update(&user_id, &event_id, changes).await? {
            return Ok(updated);
        }
    }

    user_events
        .create(&UserEvent::new(user_id, event_id, role))
        .await
}

/// Remove a registration. Returns whether one existed.
pub async fn unregister_user_from_event(
    event_id: EventId,
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<bool> {
    info!(event_id = %event_id, user_id = %user_id, "Unregistering user from event");
    deps.user_events().delete(&user_id, &event_id).await
}
