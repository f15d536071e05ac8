//! Typed ID aliases for the CRM entities.

pub use super::id::Id;

/// Marker type for User entities.
pub struct User;

/// Marker type for Event entities.
pub struct Event;

pub type UserId = Id<User>;
pub type EventId = Id<Event>;
