use thiserror::Error;

/// Failures talking to the external country source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountriesError {
    #[error("http error: {0}")]
    Http(String),
    /// Non-success status; `body` is the response text as received.
    #[error("{status} - {body}")]
    Status { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
}

impl CountriesError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CountriesError::Status { status: 404, .. })
    }
}
