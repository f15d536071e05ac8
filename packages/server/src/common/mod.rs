// Common types and utilities shared across the application

pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod nullable;
pub mod pagination;

pub use entity_ids::{EventId, UserId};
pub use errors::CrmError;
pub use id::Id;
pub use nullable::deserialize_nullable;
pub use pagination::{Page, PageArgs, ValidatedPageArgs, MAX_PAGE_SIZE};
