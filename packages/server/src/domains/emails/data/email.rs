use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::UserId;
use crate::domains::users::data::UserFilter;
use crate::domains::users::models::User;

pub const NO_RECIPIENTS_MESSAGE: &str = "No users found to send emails to based on criteria.";
pub const SEND_STARTED_MESSAGE: &str = "Email sending process initiated.";

/// Bulk email request. A non-empty `recipient_emails` wins over `filters`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    pub subject: String,
    pub template_name: String,
    #[serde(default)]
    pub template_data: Map<String, Value>,
    #[serde(default)]
    pub filters: Option<UserFilter>,
    #[serde(default)]
    pub recipient_emails: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub message: String,
    pub sent_count: usize,
    pub failed_count: usize,
    pub failed_recipients: Vec<String>,
}

impl SendEmailResponse {
    pub fn empty() -> Self {
        Self {
            message: NO_RECIPIENTS_MESSAGE.to_string(),
            sent_count: 0,
            failed_count: 0,
            failed_recipients: Vec::new(),
        }
    }

    pub fn from_result(result: BulkSendResult) -> Self {
        Self {
            message: SEND_STARTED_MESSAGE.to_string(),
            sent_count: result.sent_count,
            failed_count: result.failed_count,
            failed_recipients: result.failed_recipients,
        }
    }
}

/// One resolved email recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,
    pub first_name: String,
    pub user_id: Option<UserId>,
}

impl Recipient {
    /// An explicit address with no stored user; the local part stands in for the name
    pub fn from_address(email: &str) -> Self {
        let first_name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            email: email.to_string(),
            first_name,
            user_id: None,
        }
    }
}

impl From<User> for Recipient {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            first_name: user.first_name,
            user_id: Some(user.id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSendResult {
    pub sent_count: usize,
    pub failed_count: usize,
    /// In recipient order
    pub failed_recipients: Vec<String>,
}
