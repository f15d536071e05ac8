use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::common::{CrmError, ValidatedPageArgs};
use crate::domains::emails::actions::render_email;
use crate::domains::emails::data::{BulkSendResult, Recipient, SendEmailRequest, SendEmailResponse};
use crate::domains::users::actions::filter_users;
use crate::domains::users::data::UserSort;
use crate::kernel::{
    BaseAnalytics, BaseEmailService, EmailDeliverySummary, EmailSendRecord, ServerDeps,
};

/// Turn a request into recipients.
///
/// A non-empty `recipient_emails` is used as given and `filters` is ignored.
/// Otherwise the first `max_email_recipients` filtered users are used.
pub async fn resolve_recipients(
    request: &SendEmailRequest,
    deps: &ServerDeps,
) -> Result<Vec<Recipient>> {
    if let Some(emails) = request.recipient_emails.as_ref().filter(|e| !e.is_empty()) {
        debug!(count = emails.len(), "Using explicit recipients");
        return Ok(emails.iter().map(|e| Recipient::from_address(e)).collect());
    }

    let Some(filter) = &request.filters else {
        return Err(CrmError::bad_request(
            "Either 'recipient_emails' or 'filters' must be provided.",
        )
        .into());
    };

    let page = ValidatedPageArgs::unbounded(deps.limits.max_email_recipients);
    let users = filter_users(filter, &page, &UserSort::default(), deps).await?;
    if users.total_count > users.items.len() {
        warn!(
            matched = users.total_count,
            cap = deps.limits.max_email_recipients,
            "Filter matched more users than the recipient cap, sending to the first page only"
        );
    }

    Ok(users.items.into_iter().map(Recipient::from).collect())
}

/// Send one email per recipient, at most `bulk_email_concurrency` in flight.
///
/// A failed send never stops the others. Every attempt is recorded to
/// analytics; a failed recording is logged and otherwise ignored.
pub async fn send_bulk_emails(
    recipients: &[Recipient],
    subject: &str,
    template_data: &Map<String, Value>,
    deps: &ServerDeps,
) -> BulkSendResult {
    let max_concurrent = deps.limits.bulk_email_concurrency.max(1);

    let mut outcomes: Vec<(usize, bool)> = stream::iter(0..recipients.len())
        .map(|position| async move {
            (position, send_one(&recipients[position], subject, template_data, deps).await)
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;
    outcomes.sort_by_key(|(position, _)| *position);

    let mut result = BulkSendResult::default();
    for (position, sent) in outcomes {
        if sent {
            result.sent_count += 1;
        } else {
            result.failed_count += 1;
            result.failed_recipients.push(recipients[position].email.clone());
        }
    }

    info!(
        sent = result.sent_count,
        failed = result.failed_count,
        "Bulk email send complete"
    );
    result
}

async fn send_one(
    recipient: &Recipient,
    subject: &str,
    template_data: &Map<String, Value>,
    deps: &ServerDeps,
) -> bool {
    let html = render_email(subject, recipient, template_data);

    let (sent, record) = match deps
        .email_service
        .send_email(&recipient.email, subject, &html)
        .await
    {
        Ok(()) => (
            true,
            EmailSendRecord::sent(recipient.user_id, &recipient.email, subject),
        ),
        Err(e) => {
            warn!(recipient = %recipient.email, error = %e, "Email send failed");
            (
                false,
                EmailSendRecord::failed(recipient.user_id, &recipient.email, subject, e.to_string()),
            )
        }
    };

    if let Err(e) = deps.analytics.record_email_send_status(record).await {
        warn!(recipient = %recipient.email, error = %e, "Failed to record email send status");
    }
    sent
}

/// Resolve recipients and send the campaign
pub async fn send_emails(request: SendEmailRequest, deps: &ServerDeps) -> Result<SendEmailResponse> {
    info!(
        subject = %request.subject,
        template_name = %request.template_name,
        "Sending bulk emails"
    );

    let recipients = resolve_recipients(&request, deps).await?;
    if recipients.is_empty() {
        info!("No recipients resolved, nothing to send");
        return Ok(SendEmailResponse::empty());
    }

    let result = send_bulk_emails(&recipients, &request.subject, &request.template_data, deps).await;
    Ok(SendEmailResponse::from_result(result))
}

pub async fn email_delivery_summary(deps: &ServerDeps) -> Result<EmailDeliverySummary> {
    info!("Getting email delivery summary");
    deps.analytics.email_delivery_summary().await
}
