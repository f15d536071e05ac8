//! Emails domain - bulk campaigns to filtered users or explicit addresses

pub mod actions;
pub mod data;

pub use data::{BulkSendResult, Recipient, SendEmailRequest, SendEmailResponse};
