//! User domain actions - business logic functions
//!
//! Actions are async functions called directly from the HTTP routes.

mod create_user;
mod delete_user;
mod filter_users;
mod queries;
mod update_user;


pub use create_user::create_user;
pub use delete_user::delete_user;
pub use filter_users::filter_users;
pub use queries::{get_user, get_user_by_email};
pub use update_user::update_user;
