use thiserror::Error;

/// Failures raised below the Procedure Executor boundary.
///
/// None of these escape [`crate::db::executor::ProcedureExecutor`]; they are
/// logged and folded into a failed envelope there.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("binding error: {0}")]
    Binding(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("{0}")]
    Database(String),
    #[error("cannot map column '{column}' into '{property}': {reason}")]
    Mapping { column: String, property: String, reason: String },
    #[error("routine timed out after {0} seconds")]
    Timeout(u64),
}

impl DataError {
    pub fn binding(msg: impl Into<String>) -> Self { Self::Binding(msg.into()) }

    /// Server-side failures are logged with the "SQL Error" prefix.
    pub fn is_database(&self) -> bool { matches!(self, Self::Database(_)) }
}
