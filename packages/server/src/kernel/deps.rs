//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain actions.
//! All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use sendgrid::SendGridService;
use std::sync::Arc;
use tracing::info;

use crate::domains::events::models::EventRepository;
use crate::domains::user_events::models::UserEventRepository;
use crate::domains::users::models::UserRepository;
use crate::kernel::store::{BaseStore, Tables};
use crate::kernel::{BaseAnalytics, BaseEmailService};

// =============================================================================
// SendGridService Adapter (implements BaseEmailService trait)
// =============================================================================

/// Wrapper around SendGridService that implements BaseEmailService trait
pub struct SendGridAdapter(pub Arc<SendGridService>);

impl SendGridAdapter {
    pub fn new(service: Arc<SendGridService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseEmailService for SendGridAdapter {
    async fn send_email(&self, recipient: &str, subject: &str, html_content: &str) -> Result<()> {
        self.0
            .send_mail(recipient, subject, html_content)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

/// Sender used when no SendGrid credentials are configured. Logs and succeeds.
pub struct NoopEmailService;

#[async_trait]
impl BaseEmailService for NoopEmailService {
    async fn send_email(&self, recipient: &str, subject: &str, _html_content: &str) -> Result<()> {
        info!(recipient = %recipient, subject = %subject, "Email transport disabled, skipping send");
        Ok(())
    }
}

// =============================================================================
// Limits
// =============================================================================

/// Fan-out bounds for concurrent work inside a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Per-candidate hosted/attended count lookups in flight at once
    pub count_lookup_concurrency: usize,
    /// Email sends in flight at once
    pub bulk_email_concurrency: usize,
    /// Page size used when resolving bulk email recipients from a filter
    pub max_email_recipients: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            count_lookup_concurrency: 16,
            bulk_email_concurrency: 32,
            max_email_recipients: 10_000,
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseStore>,
    pub tables: Tables,
    pub email_service: Arc<dyn BaseEmailService>,
    pub analytics: Arc<dyn BaseAnalytics>,
    pub limits: Limits,
}

impl ServerDeps {
    /// Create new ServerDeps, opening the CRM tables under `table_prefix`
    pub fn new(
        store: Arc<dyn BaseStore>,
        table_prefix: &str,
        email_service: Arc<dyn BaseEmailService>,
        analytics: Arc<dyn BaseAnalytics>,
        limits: Limits,
    ) -> Self {
        let tables = Tables::open(store.as_ref(), table_prefix);
        Self {
            store,
            tables,
            email_service,
            analytics,
            limits,
        }
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.tables.users.clone())
    }

    pub fn events(&self) -> EventRepository {
        EventRepository::new(self.tables.events.clone())
    }

    pub fn user_events(&self) -> UserEventRepository {
        UserEventRepository::new(self.tables.user_events.clone())
    }
}
