//! Email domain actions

mod render;
mod send_emails;


pub use render::render_email;
pub use send_emails::{email_delivery_summary, resolve_recipients, send_bulk_emails, send_emails};
