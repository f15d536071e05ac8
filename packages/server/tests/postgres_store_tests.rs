//! PostgreSQL backend tests.
//!
//! One container is started for the whole run and migrations run once.
//! Each test opens its tables under a fresh prefix so tests never see each
//! other's rows. Requires Docker: `cargo test -- --ignored`.

use std::sync::Arc;

use anyhow::{Context, Result};
use crm_core::common::{EventId, PageArgs, UserId};
use crm_core::domains::user_events::models::{UserEvent, ROLE_HOST, ROLE_PARTICIPANT};
use crm_core::domains::users::actions::{create_user, filter_users, update_user};
use crm_core::domains::users::data::{CreateUserInput, UpdateUserInput, UserFilter, UserSort};
use crm_core::kernel::store::{BaseStore, BaseTable, PgStore, PrimaryKey, StoreError};
use crm_core::kernel::test_dependencies::MockEmailService;
use crm_core::kernel::{CompositeKeyRepository, InMemoryAnalytics, Limits, ServerDeps};
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

struct SharedPostgres {
    db_url: String,
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_POSTGRES
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared Postgres container")
            })
            .await
    }
}

async fn pg_deps() -> (Arc<PgStore>, ServerDeps) {
    let shared = SharedPostgres::get().await;
    let pool = PgPool::connect(&shared.db_url)
        .await
        .expect("Failed to connect to test database");
    let store = Arc::new(PgStore::new(pool));
    let prefix = format!("T{}", uuid::Uuid::new_v4().simple());

    let deps = ServerDeps::new(
        store.clone(),
        &prefix,
        Arc::new(MockEmailService::new()),
        Arc::new(InMemoryAnalytics::new()),
        Limits::default(),
    );
    (store, deps)
}

fn user_input(first: &str, city: &str) -> CreateUserInput {
    CreateUserInput {
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        phone_number: "555-0100".to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        avatar: None,
        gender: None,
        job_title: None,
        company: None,
        city: Some(city.to_string()),
        state: None,
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn ping_succeeds() {
    let (store, _deps) = pg_deps().await;
    store.ping().await.unwrap();
}

#[tokio::test]
#[ignore = "requires docker"]
async fn filter_users_over_postgres() {
    let (_store, deps) = pg_deps().await;
    for (name, city) in [("Cy", "Austin"), ("Ada", "austin"), ("Bob", "Boston")] {
        create_user(user_input(name, city), &deps).await.unwrap();
    }

    let filter = UserFilter::builder().city("AUSTIN").build();
    let page = PageArgs::default().validate().unwrap();
    let users = filter_users(&filter, &page, &UserSort::default(), &deps)
        .await
        .unwrap();

    assert_eq!(users.total_count, 2);
    // Scan order is insertion order
    let names: Vec<_> = users.items.iter().map(|u| u.first_name.as_str()).collect();
    assert_eq!(names, vec!["Cy", "Ada"]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn partial_update_merges_into_document() {
    let (_store, deps) = pg_deps().await;
    let user = create_user(user_input("Ada", "Austin"), &deps).await.unwrap();

    let changes = UpdateUserInput {
        company: Some(Some("Acme".to_string())),
        ..Default::default()
    };
    let updated = update_user(user.id, changes, &deps).await.unwrap().unwrap();

    assert_eq!(updated.company.as_deref(), Some("Acme"));
    assert_eq!(updated.city.as_deref(), Some("Austin"));
    assert!(updated.updated_at >= user.updated_at);
    assert_eq!(updated.created_at, user.created_at);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn associations_by_user_and_by_event() {
    let (_store, deps) = pg_deps().await;
    let user_events = deps.user_events();
    let (ada, bob) = (UserId::new(), UserId::new());
    let event = EventId::new();

    user_events
        .create(&UserEvent::new(ada, event, ROLE_HOST))
        .await
        .unwrap();
    user_events
        .create(&UserEvent::new(bob, event, ROLE_PARTICIPANT))
        .await
        .unwrap();

    let everyone = user_events.users_for_event(&event, None).await.unwrap();
    assert_eq!(everyone.len(), 2);

    let hosts = user_events
        .users_for_event(&event, Some(ROLE_HOST))
        .await
        .unwrap();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].user_id, ada);

    let counts = user_events.event_counts(&bob).await.unwrap();
    assert_eq!((counts.hosted, counts.attended), (0, 1));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn single_key_access_to_association_table_fails() {
    let (_store, deps) = pg_deps().await;

    let err = deps
        .tables
        .user_events
        .get(&PrimaryKey::single(UserId::new().as_key()))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::CompositeKeyRequired { .. }));
}
