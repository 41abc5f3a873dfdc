//! Forward-only, multi-result-set cursor over materialized rows.

use super::value::SqlValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { columns: columns.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Builder-style row append; short rows are padded with NULL.
    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let mut row: Vec<SqlValue> = values.into_iter().map(Into::into).collect();
        row.resize(self.columns.len(), SqlValue::Null);
        self.rows.push(row);
        self
    }
}

/// Positioned before the first row of the first result set, like a data reader.
#[derive(Debug, Clone, Default)]
pub struct ResultCursor {
    sets: Vec<ResultSet>,
    set: usize,
    // index of the current row + 1; 0 means "before first"
    row: usize,
}

impl ResultCursor {
    pub fn new(sets: Vec<ResultSet>) -> Self {
        Self { sets, set: 0, row: 0 }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(set: ResultSet) -> Self {
        Self::new(vec![set])
    }

    fn current_set(&self) -> Option<&ResultSet> {
        self.sets.get(self.set)
    }

    /// Advance to the next row of the current result set.
    pub fn read(&mut self) -> bool {
        match self.current_set() {
            Some(set) if self.row < set.rows.len() => {
                self.row += 1;
                true
            }
            _ => false,
        }
    }

    /// Advance to the next result set; the row position resets.
    pub fn next_result(&mut self) -> bool {
        if self.set + 1 < self.sets.len() {
            self.set += 1;
            self.row = 0;
            true
        } else {
            self.set = self.sets.len();
            false
        }
    }

    pub fn field_count(&self) -> usize {
        self.current_set().map(|s| s.columns.len()).unwrap_or(0)
    }

    pub fn name(&self, ordinal: usize) -> Option<&str> {
        self.current_set().and_then(|s| s.columns.get(ordinal)).map(String::as_str)
    }

    pub fn columns(&self) -> &[String] {
        self.current_set().map(|s| s.columns.as_slice()).unwrap_or(&[])
    }

    /// Case-insensitive column lookup.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.columns().iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    fn current_row(&self) -> Option<&[SqlValue]> {
        let set = self.current_set()?;
        self.row.checked_sub(1).and_then(|i| set.rows.get(i)).map(Vec::as_slice)
    }

    /// Missing rows and out-of-range ordinals read as NULL.
    pub fn is_null(&self, ordinal: usize) -> bool {
        self.value(ordinal).is_null()
    }

    pub fn value(&self, ordinal: usize) -> &SqlValue {
        const NULL: &SqlValue = &SqlValue::Null;
        self.current_row().and_then(|r| r.get(ordinal)).unwrap_or(NULL)
    }

    pub fn result_set_count(&self) -> usize {
        self.sets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_rows_then_result_sets() {
        let mut cursor = ResultCursor::new(vec![
            ResultSet::new(["Id", "Name"]).row([SqlValue::Int(1), "a".into()]).row([SqlValue::Int(2), "b".into()]),
            ResultSet::new(["TotalRecords"]).row([42]),
        ]);
        assert_eq!(cursor.field_count(), 2);
        assert!(cursor.is_null(0), "no current row before read");
        assert!(cursor.read());
        assert_eq!(cursor.value(0), &SqlValue::Int(1));
        assert!(cursor.read());
        assert_eq!(cursor.value(1), &SqlValue::Text("b".into()));
        assert!(!cursor.read());

        assert!(cursor.next_result());
        assert_eq!(cursor.ordinal("totalrecords"), Some(0));
        assert!(cursor.read());
        assert_eq!(cursor.value(0), &SqlValue::Int(42));
        assert!(!cursor.next_result());
        assert!(!cursor.read());
        assert_eq!(cursor.field_count(), 0);
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let mut cursor = ResultCursor::single(ResultSet::new(["A", "B"]).row([1]));
        assert!(cursor.read());
        assert!(!cursor.is_null(0));
        assert!(cursor.is_null(1));
        assert!(cursor.is_null(9));
    }
}
