use anyhow::Result;
use tracing::{info, warn};

use crate::common::CrmError;
use crate::domains::events::data::{CreateEventInput, CreatedEvent, OwnerRegistration};
use crate::domains::user_events::models::{UserEvent, ROLE_HOST};
use crate::kernel::{CompositeKeyRepository, KeyedRepository, ServerDeps};

/// Create an event and register its owner as a host.
///
/// Two steps, no transaction: the event write must succeed; the owner
/// association write is best-effort and its outcome is reported in
/// `owner_registration` instead of failing the call.
pub async fn create_event(input: CreateEventInput, deps: &ServerDeps) -> Result<CreatedEvent> {
    info!(slug = %input.slug, owner_id = %input.owner_id, "Creating event");

    let events = deps.events();
    if events.find_by_slug(&input.slug).await?.is_some() {
        return Err(CrmError::conflict(format!(
            "Event with slug '{}' already exists.",
            input.slug
        ))
        .into());
    }

    let event = events.create(&input.into_event()).await?;
    info!(event_id = %event.id, "Event created");

    let association = UserEvent::new(event.owner_id, event.id, ROLE_HOST);
    let owner_registration = match deps.user_events().create(&association).await {
        Ok(_) => OwnerRegistration::Registered,
        Err(e) => {
            warn!(
                event_id = %event.id,
                owner_id = %event.owner_id,
                error = %e,
                "Failed to register event owner as host"
            );
            OwnerRegistration::Failed {
                error: e.to_string(),
            }
        }
    };

    Ok(CreatedEvent {
        event,
        owner_registration,
    })
}
