//! Administrator sign-in: Argon2id password verification and HS256 tokens.
//!
//! There is a single configured administrator. Every rejected attempt costs
//! one full password derivation so that response time does not reveal
//! whether the email matched.

pub mod errors;
pub mod security;
pub mod service;
pub mod token;

pub use errors::AuthError;
pub use security::{Argon2SecurityService, SecurityService};
pub use service::AuthenticationService;
pub use token::{Claims, TokenIssuer, TokenRejection};
