//! Kernel module - server infrastructure and dependencies.

pub mod analytics;
pub mod deps;
pub mod repository;
pub mod store;
pub mod test_dependencies;
pub mod traits;

pub use analytics::{EmailDeliverySummary, EmailSendRecord, EmailStatus, InMemoryAnalytics};
pub use deps::{Limits, NoopEmailService, SendGridAdapter, ServerDeps};
pub use repository::{CompositeKeyRepository, DocumentTable, KeyedRepository};
pub use test_dependencies::TestDependencies;
pub use traits::*;
