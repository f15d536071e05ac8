use chrono::{Duration, Utc};

use super::*;
use crate::common::{CrmError, EventId, UserId};
use crate::domains::events::actions::create_event;
use crate::domains::events::data::CreateEventInput;
use crate::domains::events::models::Event;
use crate::domains::user_events::models::{ROLE_HOST, ROLE_PARTICIPANT};
use crate::domains::users::actions::create_user;
use crate::domains::users::data::CreateUserInput;
use crate::domains::users::models::User;
use crate::kernel::{ServerDeps, TestDependencies};

async fn user(deps: &ServerDeps, email: &str) -> User {
    let input = CreateUserInput {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        phone_number: "555-0199".to_string(),
        email: email.to_string(),
        avatar: None,
        gender: None,
        job_title: None,
        company: None,
        city: None,
        state: None,
    };
    create_user(input, deps).await.unwrap()
}

async fn event(deps: &ServerDeps, slug: &str, owner: UserId) -> Event {
    let start_at = Utc::now();
    let input = CreateEventInput {
        slug: slug.to_string(),
        title: "Compilers Night".to_string(),
        description: None,
        start_at,
        end_at: start_at + Duration::hours(2),
        venue: "Lab 1".to_string(),
        max_capacity: 20,
        owner_id: owner,
        hosts: vec![],
    };
    create_event(input, deps).await.unwrap().event
}

#[tokio::test]
async fn test_register_and_list_both_directions() {
    let deps = TestDependencies::new().into_server_deps();
    let owner = user(&deps, "owner@example.com").await;
    let guest = user(&deps, "guest@example.com").await;
    let meetup = event(&deps, "compilers", owner.id).await;

    register_user_for_event(meetup.id, guest.id, ROLE_PARTICIPANT, &deps)
        .await
        .unwrap();

    let everyone = list_event_registrations(meetup.id, None, &deps).await.unwrap();
    assert_eq!(everyone.len(), 2);

    let participants = list_event_registrations(meetup.id, Some(ROLE_PARTICIPANT), &deps)
        .await
        .unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].user_id, guest.id);

    let hosted = list_user_registrations(owner.id, Some(ROLE_HOST), &deps)
        .await
        .unwrap();
    assert_eq!(hosted.len(), 1);
    assert_eq!(hosted[0].event_id, meetup.id);
}

#[tokio::test]
async fn test_re_registering_changes_role_and_keeps_registration_time() {
    let deps = TestDependencies::new().into_server_deps();
    let owner = user(&deps, "owner@example.com").await;
    let guest = user(&deps, "guest@example.com").await;
    let meetup = event(&deps, "compilers", owner.id).await;

    let first = register_user_for_event(meetup.id, guest.id, ROLE_PARTICIPANT, &deps)
        .await
        .unwrap();
    let second = register_user_for_event(meetup.id, guest.id, ROLE_HOST, &deps)
        .await
        .unwrap();

    assert_eq!(second.role, ROLE_HOST);
    assert_eq!(second.registered_at, first.registered_at);
    let all = list_user_registrations(guest.id, None, &deps).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_register_requires_existing_event_and_user() {
    let deps = TestDependencies::new().into_server_deps();
    let owner = user(&deps, "owner@example.com").await;
    let meetup = event(&deps, "compilers", owner.id).await;

    let err = register_user_for_event(EventId::new(), owner.id, ROLE_HOST, &deps)
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<CrmError>(), Some(CrmError::NotFound(_))));

    let err = register_user_for_event(meetup.id, UserId::new(), ROLE_HOST, &deps)
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<CrmError>(), Some(CrmError::NotFound(_))));
}

#[tokio::test]
async fn test_register_rejects_blank_role() {
    let deps = TestDependencies::new().into_server_deps();
    let owner = user(&deps, "owner@example.com").await;
    let meetup = event(&deps, "compilers", owner.id).await;

    let err = register_user_for_event(meetup.id, owner.id, "   ", &deps)
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<CrmError>(), Some(CrmError::BadRequest(_))));
}

#[tokio::test]
async fn test_unregister() {
    let deps = TestDependencies::new().into_server_deps();
    let owner = user(&deps, "owner@example.com").await;
    let meetup = event(&deps, "compilers", owner.id).await;

    assert!(unregister_user_from_event(meetup.id, owner.id, &deps).await.unwrap());
    assert!(!unregister_user_from_event(meetup.id, owner.id, &deps).await.unwrap());
    assert!(list_event_registrations(meetup.id, None, &deps)
        .await
        .unwrap()
        .is_empty());
}
