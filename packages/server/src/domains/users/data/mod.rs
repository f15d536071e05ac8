pub mod user;

pub use user::{CreateUserInput, SortOrder, UpdateUserInput, UserFilter, UserSort};
