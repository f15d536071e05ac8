//! Users domain - CRM contacts and the user filter pipeline

pub mod actions;
pub mod data;
pub mod models;

// Re-export commonly used types
pub use data::{CreateUserInput, SortOrder, UpdateUserInput, UserFilter, UserSort};
pub use models::{User, UserRepository};
