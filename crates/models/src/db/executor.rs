//! Procedure executor: the one path every stored routine call takes.
//!
//! Each shape binds parameters, runs the routine through the driver under a
//! per-call timeout, materializes the result and returns a [`ResponseDto`].
//! Failures never escape: they are written once to the [`LogSink`] and
//! folded into a failed envelope.

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::metrics::record_routine;
use common::utils::log_sink::LogSink;
use serde::Serialize;
use tracing::{debug, instrument};

use super::cursor::ResultCursor;
use super::driver::RoutineDriver;
use super::mapping::{MappingCache, RowMapped};
use super::params::bind_params;
use super::value::FromSqlValue;
use crate::envelope::{
    ResponseDto, TablePage, NO_DATA_FROM_PROCEDURE, NO_DATA_RETURNED, NO_INFORMATION_FOUND, OPERATION_COMPLETED,
};
use crate::errors::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Command,
    List,
    Single,
    Table,
    Json,
}

impl Shape {
    fn as_str(self) -> &'static str {
        match self {
            Shape::Command => "command",
            Shape::List => "list",
            Shape::Single => "single",
            Shape::Table => "table",
            Shape::Json => "json",
        }
    }
}

/// Read a column of the current row that the caller cannot do without.
fn required<T: FromSqlValue>(cursor: &ResultCursor, column: &str) -> Result<T, DataError> {
    let mapping_error = |reason: String| DataError::Mapping {
        column: column.to_string(),
        property: column.to_string(),
        reason,
    };
    let ordinal = cursor.ordinal(column).ok_or_else(|| mapping_error("column not found".into()))?;
    if cursor.is_null(ordinal) {
        return Err(mapping_error("value is null".into()));
    }
    T::from_sql(cursor.value(ordinal)).map_err(mapping_error)
}

pub struct ProcedureExecutor {
    driver: Arc<dyn RoutineDriver>,
    cache: Arc<MappingCache>,
    log: Arc<dyn LogSink>,
    timeout: Duration,
}

impl ProcedureExecutor {
    pub fn new(
        driver: Arc<dyn RoutineDriver>,
        cache: Arc<MappingCache>,
        log: Arc<dyn LogSink>,
        timeout: Duration,
    ) -> Self {
        Self { driver, cache, log, timeout }
    }

    pub fn from_config(
        driver: Arc<dyn RoutineDriver>,
        log: Arc<dyn LogSink>,
        cfg: &configs::DatabaseConfig,
    ) -> Self {
        Self::new(driver, Arc::new(MappingCache::new()), log, Duration::from_secs(cfg.command_timeout_secs))
    }

    pub fn cache(&self) -> &Arc<MappingCache> {
        &self.cache
    }

    async fn run<P>(&self, routine: &str, params: Option<&P>) -> Result<ResultCursor, DataError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let bound = bind_params(params)?;
        match tokio::time::timeout(self.timeout, self.driver.execute(routine, &bound)).await {
            Ok(result) => result,
            Err(_) => Err(DataError::Timeout(self.timeout.as_secs())),
        }
    }

    fn report(&self, routine: &str, err: &DataError) {
        let message = if err.is_database() {
            format!("SQL Error while executing stored procedure {routine}: {err}")
        } else {
            format!("An error occurred while executing stored procedure {routine}: {err}")
        };
        self.log.log(&message);
    }

    fn settle<T>(
        &self,
        routine: &str,
        shape: Shape,
        started: Instant,
        outcome: Result<ResponseDto<T>, DataError>,
        describe: fn(&DataError) -> String,
    ) -> ResponseDto<T> {
        let envelope = match outcome {
            Ok(envelope) => envelope,
            Err(err) => {
                self.report(routine, &err);
                ResponseDto::failure(describe(&err))
            }
        };
        let elapsed = started.elapsed();
        record_routine(routine, shape.as_str(), envelope.is_success, elapsed.as_secs_f64());
        debug!(success = envelope.is_success, elapsed_ms = elapsed.as_millis() as u64, "routine settled");
        envelope
    }

    /// Shape 1: the routine reports its own outcome in `Result` / `IsSuccess`.
    #[instrument(level = "debug", skip(self, params), fields(shape = "command"))]
    pub async fn execute_command<P>(&self, routine: &str, params: Option<&P>) -> ResponseDto<()>
    where
        P: Serialize + Sync + ?Sized,
    {
        let started = Instant::now();
        let outcome = self.command(routine, params).await;
        self.settle(routine, Shape::Command, started, outcome, DataError::to_string)
    }

    async fn command<P>(&self, routine: &str, params: Option<&P>) -> Result<ResponseDto<()>, DataError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let mut cursor = self.run(routine, params).await?;
        if !cursor.read() {
            return Ok(ResponseDto::failure(NO_DATA_RETURNED));
        }
        let message: String = required(&cursor, "Result")?;
        let is_success: bool = required(&cursor, "IsSuccess")?;
        Ok(ResponseDto { is_success, message: Some(message), data: None })
    }

    /// Shape 2: every row of the first result set; no rows is a failure.
    #[instrument(level = "debug", skip(self, params), fields(shape = "list"))]
    pub async fn execute_list<T, P>(&self, routine: &str, params: Option<&P>) -> ResponseDto<Vec<T>>
    where
        T: RowMapped,
        P: Serialize + Sync + ?Sized,
    {
        let started = Instant::now();
        let outcome = self.list(routine, params).await;
        self.settle(routine, Shape::List, started, outcome, DataError::to_string)
    }

    async fn list<T, P>(&self, routine: &str, params: Option<&P>) -> Result<ResponseDto<Vec<T>>, DataError>
    where
        T: RowMapped,
        P: Serialize + Sync + ?Sized,
    {
        let mut cursor = self.run(routine, params).await?;
        let rows: Vec<T> = self.cache.map_all(&mut cursor)?;
        if rows.is_empty() {
            return Ok(ResponseDto::failure(NO_INFORMATION_FOUND));
        }
        Ok(ResponseDto::ok(rows))
    }

    /// Shape 3 with the default mapper: the first row, if there is one.
    pub async fn execute_single<T, P>(&self, routine: &str, params: Option<&P>) -> ResponseDto<T>
    where
        T: RowMapped,
        P: Serialize + Sync + ?Sized,
    {
        self.execute_single_with(routine, params, |cursor, cache| cache.map_single(cursor)).await
    }

    /// Shape 3: `map` builds at most one object from the cursor. `None` is
    /// reported as "not found", the same way an empty list is.
    #[instrument(level = "debug", skip(self, params, map), fields(shape = "single"))]
    pub async fn execute_single_with<T, P, F>(&self, routine: &str, params: Option<&P>, map: F) -> ResponseDto<T>
    where
        T: Send,
        P: Serialize + Sync + ?Sized,
        F: FnOnce(&mut ResultCursor, &MappingCache) -> Result<Option<T>, DataError> + Send,
    {
        let started = Instant::now();
        let outcome = match self.run(routine, params).await {
            Ok(mut cursor) => map(&mut cursor, &self.cache).map(|item| match item {
                Some(item) => ResponseDto::ok(item),
                None => ResponseDto::failure(NO_INFORMATION_FOUND),
            }),
            Err(err) => Err(err),
        };
        self.settle(routine, Shape::Single, started, outcome, DataError::to_string)
    }

    /// Shape 4: first result set plus `TotalRecords` from the second one.
    ///
    /// `None` params run the routine without arguments. An absent or empty
    /// second result set falls back to the number of mapped rows.
    #[instrument(level = "debug", skip(self, params), fields(shape = "table"))]
    pub async fn execute_paged<T, P>(&self, routine: &str, params: Option<&P>) -> ResponseDto<TablePage<T>>
    where
        T: RowMapped,
        P: Serialize + Sync + ?Sized,
    {
        let started = Instant::now();
        let outcome = self.paged(routine, params).await;
        self.settle(routine, Shape::Table, started, outcome, |err| {
            if err.is_database() {
                format!("Database error occurred: {err}")
            } else {
                format!("An error occurred while executing the operation: {err}")
            }
        })
    }

    async fn paged<T, P>(&self, routine: &str, params: Option<&P>) -> Result<ResponseDto<TablePage<T>>, DataError>
    where
        T: RowMapped,
        P: Serialize + Sync + ?Sized,
    {
        let mut cursor = match params {
            Some(params) => self.run(routine, Some(params)).await?,
            None => self.run(routine, Some(&super::params::NoParams {})).await?,
        };
        let results: Vec<T> = self.cache.map_all(&mut cursor)?;
        let mut total_records = results.len() as i64;
        if cursor.next_result() && cursor.read() {
            total_records = required(&cursor, "TotalRecords")?;
        }
        Ok(ResponseDto::ok(TablePage { results, total_records }))
    }

    /// Shape 5: the first column of every row, as text. One row is returned
    /// verbatim; several are joined into `[a,b,...]` without re-parsing.
    #[instrument(level = "debug", skip(self, params), fields(shape = "json"))]
    pub async fn execute_raw_json<P>(&self, routine: &str, params: Option<&P>) -> ResponseDto<String>
    where
        P: Serialize + Sync + ?Sized,
    {
        let started = Instant::now();
        let outcome = self.raw_json(routine, params).await;
        self.settle(routine, Shape::Json, started, outcome, DataError::to_string)
    }

    async fn raw_json<P>(&self, routine: &str, params: Option<&P>) -> Result<ResponseDto<String>, DataError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let mut cursor = self.run(routine, params).await?;
        let mut fragments = Vec::new();
        while cursor.read() {
            if cursor.field_count() > 0 && !cursor.is_null(0) {
                let text = String::from_sql(cursor.value(0)).map_err(|reason| DataError::Mapping {
                    column: cursor.name(0).unwrap_or_default().to_string(),
                    property: "json".into(),
                    reason,
                })?;
                fragments.push(text);
            }
        }
        Ok(match fragments.len() {
            0 => ResponseDto::success("[]".to_string(), NO_DATA_FROM_PROCEDURE),
            1 => ResponseDto::success(fragments.remove(0), OPERATION_COMPLETED),
            _ => ResponseDto::success(format!("[{}]", fragments.join(",")), OPERATION_COMPLETED),
        })
    }
}
