//! `/api/v1/emails` handlers

use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};

use crate::domains::emails::actions::{email_delivery_summary, send_emails};
use crate::domains::emails::data::{SendEmailRequest, SendEmailResponse};
use crate::kernel::EmailDeliverySummary;
use crate::server::app::AxumAppState;
use crate::server::error::ApiResult;

/// Sends synchronously; the response carries the final counts.
pub async fn send_emails_handler(
    Extension(state): Extension<AxumAppState>,
    body: Result<Json<SendEmailRequest>, JsonRejection>,
) -> ApiResult<Json<SendEmailResponse>> {
    let Json(request) = body?;
    Ok(Json(send_emails(request, &state.server_deps).await?))
}

pub async fn email_summary_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<Json<EmailDeliverySummary>> {
    Ok(Json(email_delivery_summary(&state.server_deps).await?))
}
