//! Data layer: the response envelope, DTOs and row types, and the stored
//! routine machinery in [`db`].

pub mod auth;
pub mod catalog;
pub mod country;
pub mod dashboard;
pub mod db;
pub mod envelope;
pub mod errors;
pub mod provider;
pub mod provider_service;

pub use envelope::{ResponseDto, TablePage};
pub use errors::DataError;
