//! Events domain - events, their owners and hosts

pub mod actions;
pub mod data;
pub mod models;

pub use data::{CreateEventInput, CreatedEvent, OwnerRegistration, UpdateEventInput};
pub use models::{Event, EventRepository};
