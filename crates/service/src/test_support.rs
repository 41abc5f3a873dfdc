#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use common::utils::log_sink::mock::RecordingLogSink;
use models::db::driver::mock::ScriptedDriver;
use models::db::{MappingCache, ProcedureExecutor, ResultCursor, ResultSet, SqlValue};

/// Executor over a scripted driver, plus the sink it reports failures to.
pub fn executor_with(driver: ScriptedDriver) -> (Arc<ProcedureExecutor>, Arc<ScriptedDriver>, Arc<RecordingLogSink>) {
    let driver = Arc::new(driver);
    let log = Arc::new(RecordingLogSink::default());
    let executor = ProcedureExecutor::new(driver.clone(), Arc::new(MappingCache::new()), log.clone(), Duration::from_secs(5));
    (Arc::new(executor), driver, log)
}

/// The `Result` / `IsSuccess` row a command routine answers with.
pub fn command_row(message: &str, ok: bool) -> ResultCursor {
    ResultCursor::single(ResultSet::new(["Result", "IsSuccess"]).row([SqlValue::Text(message.into()), SqlValue::Bool(ok)]))
}

/// Argon2 parameters cheap enough for unit tests.
pub fn fast_argon2() -> configs::Argon2Config {
    configs::Argon2Config { memory_kib: 1024, iterations: 2, parallelism: 1, hash_len: 32 }
}
