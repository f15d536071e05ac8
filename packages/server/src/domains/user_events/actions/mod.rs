//! Association actions - registering users with events

mod queries;
mod register;

#[cfg(test)]
mod tests;

pub use queries::{list_event_registrations, list_user_registrations};
pub use register::{register_user_for_event, unregister_user_from_event};
