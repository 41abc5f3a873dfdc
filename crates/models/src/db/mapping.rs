//! Column/property binder.
//!
//! Row types declare a typed property table once ([`RowMapped::properties`]).
//! [`MappingCache`] keeps that table per type and, per `(type, cursor shape)`,
//! the resolved list of `(property, ordinal)` pairs, so mapping a row after the
//! first costs one lookup plus one setter call per matched column.

use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::cursor::ResultCursor;
use super::value::{FromSqlValue, SqlValue};
use crate::errors::DataError;

type Setter<T> = Box<dyn Fn(&mut T, &SqlValue) -> Result<(), String> + Send + Sync>;

/// One settable property of a row type, matched to a column by name.
pub struct Property<T> {
    name: &'static str,
    set: Setter<T>,
}

impl<T> Property<T> {
    /// `Property::<Self>::new("ProviderId", |r| &mut r.provider_id)`
    pub fn new<F, A>(name: &'static str, field: A) -> Self
    where
        F: FromSqlValue,
        A: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        Self {
            name,
            set: Box::new(move |target, value| {
                *field(target) = F::from_sql(value)?;
                Ok(())
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property").field("name", &self.name).finish()
    }
}

/// A type the binder can build from a cursor row.
pub trait RowMapped: Default + Send + Sync + 'static {
    fn properties() -> Vec<Property<Self>>;
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    property: usize,
    ordinal: usize,
}

type PlanKey = (TypeId, Vec<String>);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingStats {
    pub tables: usize,
    pub plans: usize,
    /// Plans computed since construction or the last `clear`.
    pub plan_builds: u64,
}

/// Process-wide mapping cache; construct once and share behind an `Arc`.
#[derive(Default)]
pub struct MappingCache {
    tables: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    plans: DashMap<PlanKey, Arc<[Binding]>>,
    plan_builds: AtomicU64,
}

impl MappingCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn table<T: RowMapped>(&self) -> Arc<Vec<Property<T>>> {
        let id = TypeId::of::<T>();
        if let Some(hit) = self.tables.get(&id) {
            if let Ok(table) = Arc::clone(hit.value()).downcast::<Vec<Property<T>>>() {
                return table;
            }
        }
        // a concurrent first use may build the table twice; both are identical
        let table = Arc::new(T::properties());
        self.tables.insert(id, table.clone() as Arc<dyn Any + Send + Sync>);
        table
    }

    fn plan<T: RowMapped>(&self, cursor: &ResultCursor, table: &[Property<T>]) -> Arc<[Binding]> {
        let shape: Vec<String> = cursor.columns().iter().map(|c| c.to_ascii_lowercase()).collect();
        let key = (TypeId::of::<T>(), shape);
        if let Some(plan) = self.plans.get(&key) {
            return Arc::clone(plan.value());
        }
        let plan: Arc<[Binding]> = table
            .iter()
            .enumerate()
            .filter_map(|(property, p)| cursor.ordinal(p.name).map(|ordinal| Binding { property, ordinal }))
            .collect();
        self.plan_builds.fetch_add(1, Ordering::Relaxed);
        debug!(row_type = std::any::type_name::<T>(), bound = plan.len(), columns = key.1.len(), "mapping plan built");
        self.plans.insert(key, Arc::clone(&plan));
        plan
    }

    fn apply<T: RowMapped>(table: &[Property<T>], plan: &[Binding], cursor: &ResultCursor) -> Result<T, DataError> {
        let mut item = T::default();
        for binding in plan {
            let value = cursor.value(binding.ordinal);
            if value.is_null() {
                continue;
            }
            let property = &table[binding.property];
            (property.set)(&mut item, value).map_err(|reason| DataError::Mapping {
                column: cursor.name(binding.ordinal).unwrap_or_default().to_string(),
                property: property.name.to_string(),
                reason,
            })?;
        }
        Ok(item)
    }

    /// Map the cursor's current row. NULL cells leave the property at its default.
    pub fn map_row<T: RowMapped>(&self, cursor: &ResultCursor) -> Result<T, DataError> {
        let table = self.table::<T>();
        let plan = self.plan(cursor, &table);
        Self::apply(&table, &plan, cursor)
    }

    /// Drain the current result set.
    pub fn map_all<T: RowMapped>(&self, cursor: &mut ResultCursor) -> Result<Vec<T>, DataError> {
        let table = self.table::<T>();
        let plan = self.plan(cursor, &table);
        let mut items = Vec::new();
        while cursor.read() {
            items.push(Self::apply(&table, &plan, cursor)?);
        }
        Ok(items)
    }

    /// Map the next row, if any.
    pub fn map_single<T: RowMapped>(&self, cursor: &mut ResultCursor) -> Result<Option<T>, DataError> {
        if !cursor.read() {
            return Ok(None);
        }
        self.map_row(cursor).map(Some)
    }

    pub fn clear(&self) {
        self.tables.clear();
        self.plans.clear();
        self.plan_builds.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> MappingStats {
        MappingStats {
            tables: self.tables.len(),
            plans: self.plans.len(),
            plan_builds: self.plan_builds.load(Ordering::Relaxed),
        }
    }
}
