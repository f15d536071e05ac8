pub mod event;

pub use event::{CreateEventInput, CreatedEvent, OwnerRegistration, UpdateEventInput};
