//! In-memory email delivery analytics.
//!
//! Lifetime totals are kept as counters. Individual records are kept only for
//! the trailing 24 hours, so memory is bounded by one day of traffic.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::common::UserId;
use crate::kernel::BaseAnalytics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Sent,
    Failed,
}

/// Outcome of a single send attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSendRecord {
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<UserId>,
    pub email: String,
    pub subject: String,
    pub status: EmailStatus,
    pub error_message: Option<String>,
}

impl EmailSendRecord {
    pub fn sent(user_id: Option<UserId>, email: &str, subject: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id,
            email: email.to_string(),
            subject: subject.to_string(),
            status: EmailStatus::Sent,
            error_message: None,
        }
    }

    pub fn failed(user_id: Option<UserId>, email: &str, subject: &str, error: String) -> Self {
        Self {
            status: EmailStatus::Failed,
            error_message: Some(error),
            ..Self::sent(user_id, email, subject)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryCounts {
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDeliverySummary {
    pub total_emails_attempted: usize,
    pub total_emails_sent: usize,
    pub total_emails_failed: usize,
    pub last_24_hours: DeliveryCounts,
}

fn window_start() -> DateTime<Utc> {
    Utc::now() - Duration::hours(24)
}

impl DeliveryCounts {
    fn add(&mut self, status: EmailStatus) {
        match status {
            EmailStatus::Sent => self.sent += 1,
            EmailStatus::Failed => self.failed += 1,
        }
    }
}

#[derive(Default)]
struct DeliveryLog {
    totals: DeliveryCounts,
    recent: VecDeque<EmailSendRecord>,
}

impl DeliveryLog {
    /// Drop records older than the window. Arrival order is close to timestamp
    /// order, so this only walks the stale front of the queue.
    fn prune(&mut self, cutoff: DateTime<Utc>) {
        while self.recent.front().is_some_and(|r| r.timestamp < cutoff) {
            self.recent.pop_front();
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAnalytics {
    log: Arc<RwLock<DeliveryLog>>,
}

impl InMemoryAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records still inside the daily window, oldest first
    pub async fn records(&self) -> Vec<EmailSendRecord> {
        self.log.read().await.recent.iter().cloned().collect()
    }
}

#[async_trait]
impl BaseAnalytics for InMemoryAnalytics {
    async fn record_email_send_status(&self, record: EmailSendRecord) -> Result<()> {
        tracing::debug!(
            email = %record.email,
            status = ?record.status,
            "Recorded email send status"
        );
        let cutoff = window_start();
        let mut log = self.log.write().await;
        log.totals.add(record.status);
        if record.timestamp >= cutoff {
            log.recent.push_back(record);
        }
        log.prune(cutoff);
        Ok(())
    }

    async fn email_delivery_summary(&self) -> Result<EmailDeliverySummary> {
        let cutoff = window_start();
        let mut log = self.log.write().await;
        log.prune(cutoff);

        let mut last_24_hours = DeliveryCounts::default();
        for record in log.recent.iter().filter(|r| r.timestamp >= cutoff) {
            last_24_hours.add(record.status);
        }

        Ok(EmailDeliverySummary {
            total_emails_attempted: log.totals.sent + log.totals.failed,
            total_emails_sent: log.totals.sent,
            total_emails_failed: log.totals.failed,
            last_24_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_summary_counts_by_status() {
        let analytics = InMemoryAnalytics::new();
        analytics
            .record_email_send_status(EmailSendRecord::sent(None, "a@x.io", "Hi"))
            .await
            .unwrap();
        analytics
            .record_email_send_status(EmailSendRecord::failed(
                None,
                "b@x.io",
                "Hi",
                "bounced".into(),
            ))
            .await
            .unwrap();

        let summary = analytics.email_delivery_summary().await.unwrap();
        assert_eq!(summary.total_emails_attempted, 2);
        assert_eq!(summary.total_emails_sent, 1);
        assert_eq!(summary.total_emails_failed, 1);
        assert_eq!(summary.last_24_hours, DeliveryCounts { sent: 1, failed: 1 });
    }

    #[tokio::test]
    async fn test_old_records_fall_out_of_the_daily_window() {
        let analytics = InMemoryAnalytics::new();
        let mut old = EmailSendRecord::sent(None, "a@x.io", "Hi");
        old.timestamp = Utc::now() - Duration::hours(25);
        analytics.record_email_send_status(old).await.unwrap();

        let summary = analytics.email_delivery_summary().await.unwrap();
        assert_eq!(summary.total_emails_sent, 1);
        assert_eq!(summary.last_24_hours.sent, 0);
    }

    #[tokio::test]
    async fn test_stale_records_are_evicted_but_still_counted() {
        let analytics = InMemoryAnalytics::new();
        for hours_ago in [30, 26] {
            let mut old = EmailSendRecord::failed(None, "old@x.io", "Hi", "bounced".into());
            old.timestamp = Utc::now() - Duration::hours(hours_ago);
            analytics.record_email_send_status(old).await.unwrap();
        }
        analytics
            .record_email_send_status(EmailSendRecord::sent(None, "new@x.io", "Hi"))
            .await
            .unwrap();

        let kept = analytics.records().await;
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].email, "new@x.io");

        let summary = analytics.email_delivery_summary().await.unwrap();
        assert_eq!(summary.total_emails_attempted, 3);
        assert_eq!(summary.total_emails_sent, 1);
        assert_eq!(summary.total_emails_failed, 2);
        assert_eq!(summary.last_24_hours, DeliveryCounts { sent: 1, failed: 0 });
    }

    #[test]
    fn test_record_serializes_with_mixed_case_names() {
        let record = EmailSendRecord::failed(None, "a@x.io", "Hi", "boom".into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["errorMessage"], "boom");
        assert!(json["userId"].is_null());
    }
}
