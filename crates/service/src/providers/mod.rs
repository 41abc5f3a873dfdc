//! Providers: paged listing, creation, deletion and custom fields.

pub mod repository;
pub mod service;

pub use repository::{ProviderRepository, RoutineProviderRepository};
pub use service::ProviderService;
