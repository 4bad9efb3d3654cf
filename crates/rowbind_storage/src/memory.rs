//! In-memory storage backend for testing.

use crate::backend::{Quirks, StorageBackend};
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use rowbind_record::{Record, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// An in-memory storage backend.
///
/// This backend keeps real tables in memory and is suitable for:
/// - Unit and integration tests
/// - Ephemeral data that does not need persistence
///
/// Rows get auto-incremented identifiers, injected under a configurable
/// key column (default `"id"`) when the inserted record does not carry
/// one. `update` and `delete` match rows by where-record equality.
/// `begin`/`rollback` snapshot and restore the whole store.
///
/// Text statements (`query`, `fetch_row`, `fetch_rows`) are not parsed;
/// tests stage their results with [`MemoryBackend::stage_row`] and
/// [`MemoryBackend::stage_rows`], and every statement text is kept in a
/// log for assertions. A failure for the next call of a given operation
/// can be scripted with [`MemoryBackend::fail_next`].
///
/// # Connections
///
/// Cloning a `MemoryBackend` yields a second connection to the same
/// store, so a test can keep one handle for inspection while the layer
/// under test owns the other.
///
/// # Example
///
/// ```rust
/// use rowbind_record::Record;
/// use rowbind_storage::{MemoryBackend, StorageBackend};
///
/// let mut backend = MemoryBackend::new();
/// let id = backend.insert("toys", &Record::new().with("name", "sled")).unwrap();
/// assert_eq!(id, 1);
///
/// let rows = backend.rows("toys");
/// assert_eq!(rows[0].get("id").unwrap().as_integer(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
    quirks: Quirks,
}

#[derive(Debug, Clone, Default)]
struct TableData {
    last_id: i64,
    rows: Vec<Record>,
}

#[derive(Debug)]
struct MemoryState {
    tables: HashMap<String, TableData>,
    snapshot: Option<HashMap<String, TableData>>,
    key_column: String,
    staged_row: VecDeque<Option<Record>>,
    staged_rows: VecDeque<Vec<Record>>,
    failures: VecDeque<(String, String)>,
    sql_log: Vec<String>,
    last_error: Option<String>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            tables: HashMap::new(),
            snapshot: None,
            key_column: "id".to_string(),
            staged_row: VecDeque::new(),
            staged_rows: VecDeque::new(),
            failures: VecDeque::new(),
            sql_log: Vec::new(),
            last_error: None,
        }
    }
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            quirks: Quirks::default(),
        }
    }

    /// Sets the column that receives generated row identifiers.
    #[must_use]
    pub fn with_key_column(self, name: impl Into<String>) -> Self {
        self.state.lock().key_column = name.into();
        self
    }

    /// Declares value coercions for this adapter, for exercising the
    /// quirk-driven fixup in callers.
    #[must_use]
    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Stages the result of the next `fetch_row` call.
    pub fn stage_row(&self, row: Option<Record>) {
        self.state.lock().staged_row.push_back(row);
    }

    /// Stages the result of the next `fetch_rows` call.
    pub fn stage_rows(&self, rows: Vec<Record>) {
        self.state.lock().staged_rows.push_back(rows);
    }

    /// Scripts a failure for the next call of operation `op`
    /// (`"insert"`, `"update"`, `"begin"`, ...). Other operations are
    /// unaffected until the scripted one runs.
    pub fn fail_next(&self, op: impl Into<String>, message: impl Into<String>) {
        self.state
            .lock()
            .failures
            .push_back((op.into(), message.into()));
    }

    /// Returns a copy of all rows currently stored in `table`.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.state
            .lock()
            .tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Returns the text of every statement executed so far.
    #[must_use]
    pub fn sql_log(&self) -> Vec<String> {
        self.state.lock().sql_log.clone()
    }

    /// Clears all tables, staged results and logs.
    pub fn clear(&self) {
        *self.state.lock() = MemoryState::default();
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Pops a scripted failure for `op`, recording it as the connection's
/// last error.
fn take_failure(state: &mut MemoryState, op: &'static str) -> StorageResult<()> {
    state.last_error = None;
    if state.failures.front().is_some_and(|(target, _)| target == op) {
        if let Some((_, message)) = state.failures.pop_front() {
            state.last_error = Some(message.clone());
            return Err(StorageError::rejected(op, message));
        }
    }
    Ok(())
}

/// Whether `row` satisfies every pair of `filter`.
fn matches(row: &Record, filter: &Record) -> bool {
    filter.iter().all(|(key, value)| row.get(key) == Some(value))
}

fn render_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

fn render_integer(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => i64::from(*b).to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => (*f as i64).to_string(),
        Value::Text(s) => s.parse::<i64>().unwrap_or(0).to_string(),
    }
}

fn render_float(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => f64::from(u8::from(*b)).to_string(),
        Value::Integer(n) => (*n as f64).to_string(),
        Value::Float(f) => f.to_string(),
        Value::Text(s) => s.parse::<f64>().unwrap_or(0.0).to_string(),
    }
}

/// Substitutes `%s`/`%d`/`%f` placeholders in order; `%%` escapes a
/// literal percent sign.
fn substitute(sql: &str, params: &[Value]) -> StorageResult<String> {
    let mut expected = 0;
    let mut chars = sql.chars();
    while let Some(c) = chars.next() {
        if c == '%' && matches!(chars.next(), Some('s' | 'd' | 'f')) {
            expected += 1;
        }
    }
    if expected != params.len() {
        return Err(StorageError::ParameterCount {
            expected,
            given: params.len(),
        });
    }

    let mut out = String::with_capacity(sql.len());
    let mut used = 0;
    let mut chars = sql.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => {
                out.push_str(&render_text(&params[used]));
                used += 1;
            }
            Some('d') => {
                out.push_str(&render_integer(&params[used]));
                used += 1;
            }
            Some('f') => {
                out.push_str(&render_float(&params[used]));
                used += 1;
            }
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    Ok(out)
}

impl StorageBackend for MemoryBackend {
    fn query(&mut self, sql: &str) -> StorageResult<u64> {
        let mut state = self.state.lock();
        take_failure(&mut state, "query")?;
        state.sql_log.push(sql.to_string());
        Ok(0)
    }

    fn fetch_row(&mut self, sql: &str) -> StorageResult<Option<Record>> {
        let mut state = self.state.lock();
        take_failure(&mut state, "fetch_row")?;
        state.sql_log.push(sql.to_string());
        Ok(state.staged_row.pop_front().flatten())
    }

    fn fetch_rows(&mut self, sql: &str) -> StorageResult<Vec<Record>> {
        let mut state = self.state.lock();
        take_failure(&mut state, "fetch_rows")?;
        state.sql_log.push(sql.to_string());
        Ok(state.staged_rows.pop_front().unwrap_or_default())
    }

    fn prepare(&mut self, sql: &str, params: &[Value]) -> StorageResult<String> {
        let mut state = self.state.lock();
        take_failure(&mut state, "prepare")?;
        let result = substitute(sql, params);
        if let Err(err) = &result {
            state.last_error = Some(err.to_string());
        }
        result
    }

    fn insert(&mut self, table: &str, record: &Record) -> StorageResult<i64> {
        let mut state = self.state.lock();
        take_failure(&mut state, "insert")?;

        let key_column = state.key_column.clone();
        let table = state.tables.entry(table.to_string()).or_default();

        let mut row = record.clone();
        let id = match row.get(&key_column).and_then(Value::as_integer) {
            Some(explicit) if explicit > 0 => {
                table.last_id = table.last_id.max(explicit);
                explicit
            }
            _ => {
                table.last_id += 1;
                row.insert(key_column, table.last_id);
                table.last_id
            }
        };
        table.rows.push(row);
        Ok(id)
    }

    fn update(&mut self, table: &str, record: &Record, filter: &Record) -> StorageResult<u64> {
        let mut state = self.state.lock();
        take_failure(&mut state, "update")?;

        let Some(table) = state.tables.get_mut(table) else {
            return Ok(0);
        };

        let mut affected = 0;
        for row in table.rows.iter_mut().filter(|row| matches(row, filter)) {
            for (key, value) in record.iter() {
                row.insert(key, value.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    fn delete(&mut self, table: &str, filter: &Record) -> StorageResult<u64> {
        let mut state = self.state.lock();
        take_failure(&mut state, "delete")?;

        let Some(table) = state.tables.get_mut(table) else {
            return Ok(0);
        };

        let before = table.rows.len();
        table.rows.retain(|row| !matches(row, filter));
        Ok((before - table.rows.len()) as u64)
    }

    fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    fn begin(&mut self) -> StorageResult<()> {
        let mut state = self.state.lock();
        take_failure(&mut state, "begin")?;
        if state.snapshot.is_some() {
            state.last_error = Some(StorageError::TransactionActive.to_string());
            return Err(StorageError::TransactionActive);
        }
        state.snapshot = Some(state.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> StorageResult<()> {
        let mut state = self.state.lock();
        take_failure(&mut state, "commit")?;
        if state.snapshot.take().is_none() {
            state.last_error = Some(StorageError::NoActiveTransaction.to_string());
            return Err(StorageError::NoActiveTransaction);
        }
        Ok(())
    }

    fn rollback(&mut self) -> StorageResult<()> {
        let mut state = self.state.lock();
        take_failure(&mut state, "rollback")?;
        match state.snapshot.take() {
            Some(tables) => {
                state.tables = tables;
                Ok(())
            }
            None => {
                state.last_error = Some(StorageError::NoActiveTransaction.to_string());
                Err(StorageError::NoActiveTransaction)
            }
        }
    }

    fn quirks(&self) -> Quirks {
        self.quirks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_assigns_incrementing_ids() {
        let mut backend = MemoryBackend::new();

        let first = backend
            .insert("toys", &Record::new().with("name", "sled"))
            .unwrap();
        let second = backend
            .insert("toys", &Record::new().with("name", "drum"))
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let rows = backend.rows("toys");
        assert_eq!(rows[0].get("id"), Some(&Value::Integer(1)));
        assert_eq!(rows[1].get("id"), Some(&Value::Integer(2)));
    }

    #[test]
    fn insert_keeps_explicit_id_and_advances_counter() {
        let mut backend = MemoryBackend::new();

        backend
            .insert("toys", &Record::new().with("id", 10).with("name", "sled"))
            .unwrap();
        let next = backend
            .insert("toys", &Record::new().with("name", "drum"))
            .unwrap();

        assert_eq!(next, 11);
    }

    #[test]
    fn key_column_is_configurable() {
        let mut backend = MemoryBackend::new().with_key_column("toy_id");

        backend
            .insert("toys", &Record::new().with("name", "sled"))
            .unwrap();

        let rows = backend.rows("toys");
        assert_eq!(rows[0].get("toy_id"), Some(&Value::Integer(1)));
        assert_eq!(rows[0].get("id"), None);
    }

    #[test]
    fn update_matches_where_record() {
        let mut backend = MemoryBackend::new();
        backend
            .insert("toys", &Record::new().with("name", "sled"))
            .unwrap();
        backend
            .insert("toys", &Record::new().with("name", "drum"))
            .unwrap();

        let affected = backend
            .update(
                "toys",
                &Record::new().with("name", "red sled"),
                &Record::new().with("id", 1),
            )
            .unwrap();

        assert_eq!(affected, 1);
        let rows = backend.rows("toys");
        assert_eq!(rows[0].get("name"), Some(&Value::Text("red sled".into())));
        assert_eq!(rows[1].get("name"), Some(&Value::Text("drum".into())));
    }

    #[test]
    fn update_missing_table_affects_nothing() {
        let mut backend = MemoryBackend::new();
        let affected = backend
            .update("ghosts", &Record::new().with("a", 1), &Record::new())
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[test]
    fn delete_matches_where_record() {
        let mut backend = MemoryBackend::new();
        backend
            .insert("toys", &Record::new().with("name", "sled"))
            .unwrap();
        backend
            .insert("toys", &Record::new().with("name", "drum"))
            .unwrap();

        let affected = backend
            .delete("toys", &Record::new().with("name", "sled"))
            .unwrap();

        assert_eq!(affected, 1);
        assert_eq!(backend.rows("toys").len(), 1);
    }

    #[test]
    fn rollback_restores_snapshot() {
        let mut backend = MemoryBackend::new();
        backend
            .insert("toys", &Record::new().with("name", "sled"))
            .unwrap();

        backend.begin().unwrap();
        backend
            .insert("toys", &Record::new().with("name", "drum"))
            .unwrap();
        backend
            .delete("toys", &Record::new().with("id", 1))
            .unwrap();
        backend.rollback().unwrap();

        let rows = backend.rows("toys");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&Value::Text("sled".into())));
    }

    #[test]
    fn commit_keeps_changes() {
        let mut backend = MemoryBackend::new();

        backend.begin().unwrap();
        backend
            .insert("toys", &Record::new().with("name", "sled"))
            .unwrap();
        backend.commit().unwrap();

        assert_eq!(backend.rows("toys").len(), 1);
    }

    #[test]
    fn nested_begin_is_rejected() {
        let mut backend = MemoryBackend::new();
        backend.begin().unwrap();

        let result = backend.begin();
        assert!(matches!(result, Err(StorageError::TransactionActive)));
    }

    #[test]
    fn commit_without_begin_is_rejected() {
        let mut backend = MemoryBackend::new();
        assert!(matches!(
            backend.commit(),
            Err(StorageError::NoActiveTransaction)
        ));
        assert!(matches!(
            backend.rollback(),
            Err(StorageError::NoActiveTransaction)
        ));
    }

    #[test]
    fn scripted_failure_sets_last_error() {
        let mut backend = MemoryBackend::new();
        backend.fail_next("insert", "duplicate entry 'sled'");

        let result = backend.insert("toys", &Record::new().with("name", "sled"));

        assert!(matches!(result, Err(StorageError::Rejected { .. })));
        assert_eq!(
            backend.last_error(),
            Some("duplicate entry 'sled'".to_string())
        );

        // The next operation succeeds and clears the diagnostic.
        backend
            .insert("toys", &Record::new().with("name", "drum"))
            .unwrap();
        assert_eq!(backend.last_error(), None);
    }

    #[test]
    fn scripted_failure_waits_for_its_operation() {
        let mut backend = MemoryBackend::new();
        backend.fail_next("update", "deadlock found");

        // An insert is unaffected by a failure scripted for update.
        backend
            .insert("toys", &Record::new().with("name", "sled"))
            .unwrap();

        let result = backend.update("toys", &Record::new().with("name", "drum"), &Record::new());
        assert!(matches!(result, Err(StorageError::Rejected { .. })));
    }

    #[test]
    fn staged_rows_are_consumed_in_order() {
        let mut backend = MemoryBackend::new();
        backend.stage_rows(vec![Record::new().with("id", 1)]);
        backend.stage_rows(vec![]);

        assert_eq!(backend.fetch_rows("SELECT 1").unwrap().len(), 1);
        assert!(backend.fetch_rows("SELECT 2").unwrap().is_empty());
        assert_eq!(backend.sql_log(), vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn staged_row() {
        let mut backend = MemoryBackend::new();
        backend.stage_row(Some(Record::new().with("id", 9)));

        let row = backend.fetch_row("SELECT 9").unwrap().unwrap();
        assert_eq!(row.get("id"), Some(&Value::Integer(9)));
        assert!(backend.fetch_row("SELECT none").unwrap().is_none());
    }

    #[test]
    fn clones_share_one_store() {
        let mut backend = MemoryBackend::new();
        let observer = backend.clone();

        backend
            .insert("toys", &Record::new().with("name", "sled"))
            .unwrap();

        assert_eq!(observer.rows("toys").len(), 1);
    }

    #[test]
    fn prepare_substitutes_in_order() {
        let mut backend = MemoryBackend::new();

        let sql = backend
            .prepare(
                "SELECT * FROM toys WHERE name = %s AND quantity > %d",
                &[Value::Text("o'sled".into()), Value::Integer(3)],
            )
            .unwrap();

        assert_eq!(sql, "SELECT * FROM toys WHERE name = 'o''sled' AND quantity > 3");
    }

    #[test]
    fn prepare_renders_null_and_floats() {
        let mut backend = MemoryBackend::new();

        let sql = backend
            .prepare(
                "UPDATE toys SET weight = %f, note = %s",
                &[Value::Float(1.5), Value::Null],
            )
            .unwrap();

        assert_eq!(sql, "UPDATE toys SET weight = 1.5, note = NULL");
    }

    #[test]
    fn prepare_rejects_parameter_count_mismatch() {
        let mut backend = MemoryBackend::new();

        let result = backend.prepare("WHERE a = %s AND b = %d", &[Value::Integer(1)]);

        assert!(matches!(
            result,
            Err(StorageError::ParameterCount {
                expected: 2,
                given: 1
            })
        ));
        assert!(backend.last_error().is_some());
    }

    #[test]
    fn prepare_escaped_percent() {
        let mut backend = MemoryBackend::new();
        let sql = backend.prepare("LIKE '%%sled%%'", &[]).unwrap();
        assert_eq!(sql, "LIKE '%sled%'");
    }

    #[test]
    fn clear_resets_everything() {
        let mut backend = MemoryBackend::new();
        backend
            .insert("toys", &Record::new().with("name", "sled"))
            .unwrap();
        backend.stage_rows(vec![Record::new()]);

        backend.clear();

        assert!(backend.rows("toys").is_empty());
        assert!(backend.fetch_rows("SELECT").unwrap().is_empty());
    }
}
