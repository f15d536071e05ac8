//! UserEvents domain - the user/event association and its role

pub mod actions;
pub mod data;
pub mod models;

pub use data::{RegisterInput, RoleFilter};
pub use models::{EventCounts, UserEvent, UserEventRepository, ROLE_HOST, ROLE_PARTICIPANT};
