//! Postgres routine driver on top of the SeaORM connection pool.
//!
//! Routines follow the `RETURNS SETOF refcursor` contract: the call returns
//! one cursor name per result set, each drained with `FETCH ALL` inside the
//! same transaction. Parameters are passed in named notation, each one cast
//! to the type the routine declares for it. Declared signatures are read
//! from `pg_proc` once per routine and cached on the driver.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, FromQueryResult, JsonValue,
    Statement, TransactionTrait, Value,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::cursor::{ResultCursor, ResultSet};
use super::driver::RoutineDriver;
use super::params::RoutineParam;
use super::value::{FromSqlValue, SqlValue};
use crate::errors::DataError;

const CURSOR_COLUMN: &str = "cursor_name";

// IN arguments only; refcursor routines declare no OUT arguments
const SIGNATURE_SQL: &str = "SELECT a.arg_name, format_type(a.arg_type, NULL) AS arg_type \
     FROM pg_proc p \
     CROSS JOIN LATERAL unnest(p.proargnames[1:p.pronargs], p.proargtypes::oid[]) \
         WITH ORDINALITY AS a(arg_name, arg_type, position) \
     WHERE p.oid = to_regproc($1)::oid \
     ORDER BY a.position";

/// Build the pooled connection from configuration.
pub async fn connect_with_config(cfg: &configs::DatabaseConfig) -> Result<DatabaseConnection, DataError> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await.map_err(classify)?;
    info!(max = cfg.max_connections, min = cfg.min_connections, "database pool ready");
    Ok(db)
}

fn classify(err: DbErr) -> DataError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => DataError::Connection(err.to_string()),
        other => DataError::Database(other.to_string()),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// One declared argument: catalog spelling of the name and `format_type` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoutineArg {
    pub name: String,
    pub pg_type: String,
}

impl RoutineArg {
    pub fn new(name: impl Into<String>, pg_type: impl Into<String>) -> Self {
        Self { name: name.into(), pg_type: pg_type.into() }
    }
}

type Signature = Arc<[RoutineArg]>;

fn to_db_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::String(None),
        SqlValue::Bool(b) => Value::from(*b),
        SqlValue::Int(i) => Value::from(*i),
        SqlValue::Float(x) => Value::from(*x),
        SqlValue::Decimal(d) => Value::from(*d),
        SqlValue::Text(s) => Value::from(s.clone()),
        SqlValue::Uuid(u) => Value::from(*u),
        SqlValue::DateTime(d) => Value::from(*d),
        SqlValue::Bytes(b) => Value::from(b.clone()),
    }
}

fn typed<T: FromSqlValue>(value: &SqlValue, param: &str, pg_type: &str) -> Result<Option<T>, DataError> {
    if value.is_null() {
        return Ok(None);
    }
    T::from_sql(value)
        .map(Some)
        .map_err(|reason| DataError::binding(format!("cannot bind {param} as {pg_type}: {reason}")))
}

/// Convert a bound value to the Rust type matching the declared argument type.
/// Unknown types keep their natural encoding and rely on the SQL cast.
fn coerce(value: &SqlValue, param: &str, pg_type: &str) -> Result<Value, DataError> {
    Ok(match pg_type {
        "smallint" => Value::from(typed::<i16>(value, param, pg_type)?),
        "integer" => Value::from(typed::<i32>(value, param, pg_type)?),
        "bigint" => Value::from(typed::<i64>(value, param, pg_type)?),
        "real" => Value::from(typed::<f32>(value, param, pg_type)?),
        "double precision" => Value::from(typed::<f64>(value, param, pg_type)?),
        "numeric" => Value::from(typed::<Decimal>(value, param, pg_type)?),
        "boolean" => Value::from(typed::<bool>(value, param, pg_type)?),
        "uuid" => Value::from(typed::<Uuid>(value, param, pg_type)?),
        "timestamp without time zone" => Value::from(typed::<NaiveDateTime>(value, param, pg_type)?),
        "timestamp with time zone" => Value::from(typed::<DateTime<Utc>>(value, param, pg_type)?),
        "text" | "character varying" | "character" | "bpchar" | "json" | "jsonb" => {
            Value::from(typed::<String>(value, param, pg_type)?)
        }
        _ => to_db_value(value),
    })
}

/// `SELECT c::text AS cursor_name FROM dbo.sp_x("Name" => $1::integer, ...) AS c`
///
/// Every parameter must match a declared argument, case-insensitively.
pub(crate) fn call_statement(
    routine: &str,
    params: &[RoutineParam],
    signature: &[RoutineArg],
) -> Result<Statement, DataError> {
    if routine.is_empty() || !routine.split('.').all(is_identifier) {
        return Err(DataError::binding(format!("invalid routine name '{routine}'")));
    }
    let mut args = Vec::with_capacity(params.len());
    let mut values = Vec::with_capacity(params.len());
    for (i, param) in params.iter().enumerate() {
        let name = param.bare_name();
        if !is_identifier(name) {
            return Err(DataError::binding(format!("invalid parameter name '{}'", param.name)));
        }
        let Some(arg) = signature.iter().find(|arg| arg.name.eq_ignore_ascii_case(name)) else {
            return Err(DataError::binding(format!("{routine} has no parameter named {}", param.name)));
        };
        args.push(format!("{} => ${}::{}", quote_ident(&arg.name), i + 1, arg.pg_type));
        values.push(coerce(&param.value, &param.name, &arg.pg_type)?);
    }
    let sql = format!("SELECT c::text AS {CURSOR_COLUMN} FROM {routine}({}) AS c", args.join(", "));
    Ok(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
}

fn signature_from_json(rows: &[JsonValue]) -> Vec<RoutineArg> {
    rows.iter()
        .filter_map(|row| {
            let name = row.get("arg_name")?.as_str()?;
            let pg_type = row.get("arg_type")?.as_str()?;
            Some(RoutineArg::new(name, pg_type))
        })
        .collect()
}

/// Column order comes from the first row; empty sets carry no columns.
pub(crate) fn result_set_from_json(rows: Vec<JsonValue>) -> ResultSet {
    let mut set = ResultSet::default();
    for row in rows {
        let JsonValue::Object(mut fields) = row else { continue };
        if set.columns.is_empty() {
            set.columns = fields.keys().cloned().collect();
        }
        set.rows.push(
            set.columns
                .iter()
                .map(|c| fields.remove(c).map(SqlValue::from).unwrap_or(SqlValue::Null))
                .collect(),
        );
    }
    set
}

#[derive(Clone)]
pub struct SeaOrmRoutineDriver {
    db: DatabaseConnection,
    signatures: Arc<DashMap<String, Signature>>,
}

impl SeaOrmRoutineDriver {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, signatures: Arc::new(DashMap::new()) }
    }

    pub async fn connect(cfg: &configs::DatabaseConfig) -> Result<Self, DataError> {
        Ok(Self::new(connect_with_config(cfg).await?))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Drop cached signatures, e.g. after routines were redefined.
    pub fn forget_signatures(&self) {
        self.signatures.clear();
    }

    async fn signature(&self, txn: &DatabaseTransaction, routine: &str) -> Result<Signature, DataError> {
        // unquoted names fold to lower case on the server
        let key = routine.to_ascii_lowercase();
        if let Some(found) = self.signatures.get(&key) {
            return Ok(found.clone());
        }
        let lookup = Statement::from_sql_and_values(DbBackend::Postgres, SIGNATURE_SQL, [Value::from(routine)]);
        let rows = JsonValue::find_by_statement(lookup).all(txn).await.map_err(classify)?;
        let signature: Signature = signature_from_json(&rows).into();
        if signature.is_empty() {
            return Err(DataError::Database(format!("could not find routine {routine} with named parameters")));
        }
        debug!(routine, args = signature.len(), "routine signature cached");
        self.signatures.insert(key, signature.clone());
        Ok(signature)
    }
}

#[async_trait]
impl RoutineDriver for SeaOrmRoutineDriver {
    #[instrument(level = "debug", skip(self, params), fields(params = params.len()))]
    async fn execute(&self, routine: &str, params: &[RoutineParam]) -> Result<ResultCursor, DataError> {
        // reject bad names before they reach the catalog lookup
        call_statement(routine, &[], &[])?;
        // dropping the transaction on an early return rolls it back
        let txn = self.db.begin().await.map_err(classify)?;
        let call = if params.is_empty() {
            call_statement(routine, params, &[])?
        } else {
            let signature = self.signature(&txn, routine).await?;
            call_statement(routine, params, &signature)?
        };
        let handles = JsonValue::find_by_statement(call).all(&txn).await.map_err(classify)?;

        let mut sets = Vec::with_capacity(handles.len());
        for handle in handles {
            let Some(cursor) = handle.get(CURSOR_COLUMN).and_then(JsonValue::as_str) else {
                return Err(DataError::Database(format!("{routine} did not return a cursor")));
            };
            let fetch = Statement::from_string(DbBackend::Postgres, format!("FETCH ALL FROM {}", quote_ident(cursor)));
            let rows = JsonValue::find_by_statement(fetch).all(&txn).await.map_err(classify)?;
            sets.push(result_set_from_json(rows));
        }
        txn.commit().await.map_err(classify)?;
        debug!(result_sets = sets.len(), "routine drained");
        Ok(ResultCursor::new(sets))
    }
}
