use chrono::{Duration, Utc};
use std::sync::Arc;

use super::*;
use crate::common::{CrmError, EventId, UserId};
use crate::domains::events::data::{CreateEventInput, OwnerRegistration, UpdateEventInput};
use crate::domains::user_events::models::ROLE_HOST;
use crate::kernel::test_dependencies::{FaultyTable, TableOp};
use crate::kernel::{CompositeKeyRepository, KeyedRepository, TestDependencies};

fn input(slug: &str, owner: UserId, hosts: Vec<UserId>) -> CreateEventInput {
    let start_at = Utc::now() + Duration::days(30);
    CreateEventInput {
        slug: slug.to_string(),
        title: "Rust Meetup".to_string(),
        description: Some("Monthly meetup".to_string()),
        start_at,
        end_at: start_at + Duration::hours(3),
        venue: "Community Hall".to_string(),
        max_capacity: 50,
        owner_id: owner,
        hosts,
    }
}

#[tokio::test]
async fn test_create_event_adds_owner_to_hosts_and_registers_owner() {
    let deps = TestDependencies::new().into_server_deps();
    let owner = UserId::new();
    let cohost = UserId::new();

    let created = create_event(input("meetup", owner, vec![cohost]), &deps)
        .await
        .unwrap();

    assert!(created.event.is_host(&owner));
    assert!(created.event.is_host(&cohost));
    assert_eq!(created.owner_registration, OwnerRegistration::Registered);

    let association = deps
        .user_events()
        .get(&owner, &created.event.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(association.role, ROLE_HOST);

    let stored = get_event(created.event.id, &deps).await.unwrap().unwrap();
    assert!(stored.is_host(&owner));
}

#[tokio::test]
async fn test_duplicate_slug_is_a_conflict_and_writes_nothing() {
    let deps = TestDependencies::new().into_server_deps();
    create_event(input("meetup", UserId::new(), vec![]), &deps)
        .await
        .unwrap();

    let second_owner = UserId::new();
    let err = create_event(input("meetup", second_owner, vec![]), &deps)
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<CrmError>(), Some(CrmError::Conflict(_))));
    assert_eq!(list_events(&deps).await.unwrap().len(), 1);
    assert!(deps
        .user_events()
        .events_for_user(&second_owner, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_owner_registration_failure_is_not_fatal() {
    let mut deps = TestDependencies::new().into_server_deps();
    deps.tables.user_events = Arc::new(
        FaultyTable::new(deps.tables.user_events.clone()).failing_on(TableOp::Put),
    );

    let created = create_event(input("meetup", UserId::new(), vec![]), &deps)
        .await
        .unwrap();

    assert!(matches!(
        created.owner_registration,
        OwnerRegistration::Failed { .. }
    ));
    assert!(get_event(created.event.id, &deps).await.unwrap().is_some());
}

#[tokio::test]
async fn test_get_event_by_slug() {
    let deps = TestDependencies::new().into_server_deps();
    let created = create_event(input("rust-nyc", UserId::new(), vec![]), &deps)
        .await
        .unwrap();

    assert_eq!(
        get_event_by_slug("rust-nyc", &deps).await.unwrap(),
        Some(created.event)
    );
    assert!(get_event_by_slug("nope", &deps).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_event_does_not_enforce_owner_in_hosts() {
    let deps = TestDependencies::new().into_server_deps();
    let owner = UserId::new();
    let created = create_event(input("meetup", owner, vec![]), &deps)
        .await
        .unwrap();

    let changes = UpdateEventInput {
        title: Some("Renamed".to_string()),
        hosts: Some(vec![]),
        ..Default::default()
    };
    let updated = update_event(created.event.id, changes, &deps)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert!(updated.hosts.is_empty());
    assert_eq!(updated.owner_id, owner);
    assert_eq!(updated.slug, "meetup");
}

#[tokio::test]
async fn test_explicit_null_clears_description() {
    let deps = TestDependencies::new().into_server_deps();
    let created = create_event(input("meetup", UserId::new(), vec![]), &deps)
        .await
        .unwrap();
    assert!(created.event.description.is_some());

    let changes: UpdateEventInput = serde_json::from_str(r#"{"description": null}"#).unwrap();
    let updated = update_event(created.event.id, changes, &deps)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.description, None);
    assert_eq!(updated.title, created.event.title);
}

#[tokio::test]
async fn test_empty_event_update_returns_current_state() {
    let deps = TestDependencies::new().into_server_deps();
    let created = create_event(input("meetup", UserId::new(), vec![]), &deps)
        .await
        .unwrap();

    let same = update_event(created.event.id, UpdateEventInput::default(), &deps)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(same, created.event);
}

#[tokio::test]
async fn test_delete_event_keeps_associations() {
    let deps = TestDependencies::new().into_server_deps();
    let owner = UserId::new();
    let created = create_event(input("meetup", owner, vec![]), &deps)
        .await
        .unwrap();

    assert!(delete_event(created.event.id, &deps).await.unwrap());
    assert!(!delete_event(created.event.id, &deps).await.unwrap());
    assert!(deps.events().get(&created.event.id).await.unwrap().is_none());

    let dangling = deps
        .user_events()
        .users_for_event(&created.event.id, None)
        .await
        .unwrap();
    assert_eq!(dangling.len(), 1);
}

#[tokio::test]
async fn test_update_missing_event_is_none() {
    let deps = TestDependencies::new().into_server_deps();
    let changes = UpdateEventInput {
        venue: Some("Elsewhere".to_string()),
        ..Default::default()
    };
    assert!(update_event(EventId::new(), changes, &deps)
        .await
        .unwrap()
        .is_none());
}
