// Business domains
pub mod emails;
pub mod events;
pub mod user_events;
pub mod users;
