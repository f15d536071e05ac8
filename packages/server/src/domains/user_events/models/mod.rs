pub mod user_event;

pub use user_event::{EventCounts, UserEvent, UserEventRepository, ROLE_HOST, ROLE_PARTICIPANT};
