// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (recipient selection, templating) lives in domain actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseEmailService, BaseAnalytics)

use anyhow::Result;
use async_trait::async_trait;

use crate::kernel::analytics::{EmailDeliverySummary, EmailSendRecord};

// =============================================================================
// Email Service Trait (Infrastructure - transactional mail)
// =============================================================================

#[async_trait]
pub trait BaseEmailService: Send + Sync {
    /// Send one HTML email to one recipient
    async fn send_email(&self, recipient: &str, subject: &str, html_content: &str) -> Result<()>;
}

// =============================================================================
// Analytics Trait (Infrastructure - delivery bookkeeping)
// =============================================================================

#[async_trait]
pub trait BaseAnalytics: Send + Sync {
    /// Record the outcome of one send attempt
    async fn record_email_send_status(&self, record: EmailSendRecord) -> Result<()>;

    /// Totals over every recorded attempt, plus the trailing 24 hours
    async fn email_delivery_summary(&self) -> Result<EmailDeliverySummary>;
}
