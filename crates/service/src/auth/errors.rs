use thiserror::Error;

/// Failures inside the authentication flow. None of them reach the caller
/// verbatim; the use case turns them into a generic failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Hash(_) => 1101,
            AuthError::Token(_) => 1102,
            AuthError::Config(_) => 1103,
        }
    }
}
