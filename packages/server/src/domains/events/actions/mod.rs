//! Event domain actions - business logic functions

mod create_event;
mod delete_event;
mod queries;
mod update_event;

#[cfg(test)]
mod tests;

pub use create_event::create_event;
pub use delete_event::delete_event;
pub use queries::{get_event, get_event_by_slug, list_events};
pub use update_event::update_event;
