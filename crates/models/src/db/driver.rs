use async_trait::async_trait;

use super::cursor::ResultCursor;
use super::params::RoutineParam;
use crate::errors::DataError;

/// Runs one named stored routine and materializes every result set it returns.
///
/// Implementations acquire their own connection per call and release it on
/// every exit path; nothing is shared between concurrent calls.
#[async_trait]
pub trait RoutineDriver: Send + Sync {
    async fn execute(&self, routine: &str, params: &[RoutineParam]) -> Result<ResultCursor, DataError>;
}

/// Scripted driver for tests and local runs without a database.
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::RoutineDriver;
    use crate::db::cursor::ResultCursor;
    use crate::db::params::RoutineParam;
    use crate::errors::DataError;

    #[derive(Debug, Clone)]
    enum Outcome {
        Rows(ResultCursor),
        Fail(DataError),
    }

    #[derive(Debug, Clone)]
    struct Script {
        outcome: Outcome,
        delay: Option<Duration>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub routine: String,
        pub params: Vec<RoutineParam>,
    }

    impl RecordedCall {
        pub fn param(&self, name: &str) -> Option<&RoutineParam> {
            self.params.iter().find(|p| p.name == name)
        }
    }

    /// Routine names are matched case-insensitively. Unscripted routines fail
    /// the way a missing procedure would, unless a fallback error is set.
    #[derive(Debug, Default)]
    pub struct ScriptedDriver {
        scripts: Mutex<HashMap<String, Script>>,
        fallback: Option<DataError>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedDriver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every routine fails with `error`.
        pub fn failing(error: DataError) -> Self {
            Self { fallback: Some(error), ..Self::default() }
        }

        fn script(self, routine: &str, outcome: Outcome) -> Self {
            if let Ok(mut scripts) = self.scripts.lock() {
                scripts.insert(routine.to_ascii_lowercase(), Script { outcome, delay: None });
            }
            self
        }

        pub fn with_cursor(self, routine: &str, cursor: ResultCursor) -> Self {
            self.script(routine, Outcome::Rows(cursor))
        }

        pub fn with_error(self, routine: &str, error: DataError) -> Self {
            self.script(routine, Outcome::Fail(error))
        }

        /// Delay an already scripted routine.
        pub fn with_delay(self, routine: &str, delay: Duration) -> Self {
            if let Ok(mut scripts) = self.scripts.lock() {
                if let Some(script) = scripts.get_mut(&routine.to_ascii_lowercase()) {
                    script.delay = Some(delay);
                }
            }
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        pub fn last_call(&self) -> Option<RecordedCall> {
            self.calls.lock().ok().and_then(|c| c.last().cloned())
        }
    }

    #[async_trait]
    impl RoutineDriver for ScriptedDriver {
        async fn execute(&self, routine: &str, params: &[RoutineParam]) -> Result<ResultCursor, DataError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(RecordedCall { routine: routine.to_string(), params: params.to_vec() });
            }
            let script = self
                .scripts
                .lock()
                .ok()
                .and_then(|s| s.get(&routine.to_ascii_lowercase()).cloned());
            let Some(script) = script else {
                return Err(self
                    .fallback
                    .clone()
                    .unwrap_or_else(|| DataError::Database(format!("Could not find stored procedure '{routine}'."))));
            };
            if let Some(delay) = script.delay {
                tokio::time::sleep(delay).await;
            }
            match script.outcome {
                Outcome::Rows(cursor) => Ok(cursor),
                Outcome::Fail(error) => Err(error),
            }
        }
    }
}
