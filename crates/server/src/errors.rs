use thiserror::Error;

use models::DataError;
use service::auth::AuthError;
use service::countries::CountriesError;

/// Failures that stop the process before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(#[from] DataError),
    #[error("authentication setup failed: {0}")]
    Auth(#[from] AuthError),
    #[error("country source setup failed: {0}")]
    Countries(#[from] CountriesError),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
