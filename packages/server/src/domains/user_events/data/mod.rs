pub mod registration;

pub use registration::{RegisterInput, RoleFilter};
