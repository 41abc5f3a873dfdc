//! Billable services: paged listing, create, update, delete.

pub mod repository;
pub mod service;

pub use repository::{CatalogRepository, RoutineCatalogRepository};
pub use service::CatalogService;
