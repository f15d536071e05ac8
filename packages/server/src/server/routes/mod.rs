// HTTP routes
pub mod emails;
pub mod events;
pub mod health;
pub mod users;

pub use health::*;
