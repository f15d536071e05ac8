// Event CRM - API Core
//
// Backend for an event-management CRM: users, events, the user/event
// association, and bulk email campaigns driven by user filters.
// Architecture follows domain-driven design: domains/*/{models,data,actions}.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
