//! Stored routine access: value model, cursor, binders, drivers and the executor.

pub mod cursor;
pub mod driver;
pub mod executor;
pub mod mapping;
pub mod params;
pub mod seaorm;
pub mod value;

pub use cursor::{ResultCursor, ResultSet};
pub use driver::RoutineDriver;
pub use executor::ProcedureExecutor;
pub use mapping::{MappingCache, MappingStats, Property, RowMapped};
pub use params::{bind_params, NoParams, RoutineParam};
pub use seaorm::{connect_with_config, SeaOrmRoutineDriver};
pub use value::{FromSqlValue, SqlValue};
