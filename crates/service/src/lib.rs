//! Application layer on top of `models`.
//! - Repositories bind each entity to its stored routines through the
//!   [`models::db::ProcedureExecutor`].
//! - Use cases hold the logic that cannot live in SQL: the country catalog,
//!   the dashboard summary and administrator authentication.
//! - Everything returns a [`models::ResponseDto`]; failures are logged and
//!   folded into the envelope instead of being raised.

pub mod assignments;
pub mod auth;
pub mod catalog;
pub mod countries;
pub mod dashboard;
pub mod errors;
pub mod providers;
#[cfg(test)]
pub mod test_support;

pub use errors::envelope_from_error;
