pub mod email;

pub use email::{BulkSendResult, Recipient, SendEmailRequest, SendEmailResponse};
