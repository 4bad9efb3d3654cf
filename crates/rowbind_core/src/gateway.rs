//! Storage execution boundary.

use crate::error::{CoreError, CoreResult};
use parking_lot::Mutex;
use rowbind_record::{Record, Value};
use rowbind_storage::{Quirks, StorageBackend, StorageResult};
use tracing::debug;

/// A thin execution boundary over one storage backend.
///
/// The gateway owns the connection handle exclusively and adds two
/// things to the raw backend: the configured table-name prefix, and the
/// value fixup requested by the backend's [`Quirks`] (null and boolean
/// cells rewritten before they reach `insert`/`update`/`prepare`).
///
/// At most one transaction may be in flight per gateway; concurrent
/// callers must be given independent gateways over their own
/// connections.
pub struct Gateway {
    backend: Mutex<Box<dyn StorageBackend>>,
    table_prefix: String,
    quirks: Quirks,
}

impl Gateway {
    /// Creates a gateway owning `backend`, with `table_prefix` applied
    /// by repositories when they resolve source names.
    pub fn new(backend: Box<dyn StorageBackend>, table_prefix: impl Into<String>) -> Self {
        let quirks = backend.quirks();
        Self {
            backend: Mutex::new(backend),
            table_prefix: table_prefix.into(),
            quirks,
        }
    }

    /// The configured table-name prefix.
    #[must_use]
    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// Executes a text statement, returning the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the statement.
    pub fn query(&self, sql: &str) -> StorageResult<u64> {
        self.backend.lock().query(sql)
    }

    /// Executes a text statement, returning the first result row.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the statement.
    pub fn fetch_row(&self, sql: &str) -> StorageResult<Option<Record>> {
        self.backend.lock().fetch_row(sql)
    }

    /// Executes a text statement, returning all result rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the statement.
    pub fn fetch_rows(&self, sql: &str) -> StorageResult<Vec<Record>> {
        self.backend.lock().fetch_rows(sql)
    }

    /// Binds `params` into the statement's placeholders, applying the
    /// quirk fixup to the parameters first.
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder count does not match
    /// `params`.
    pub fn prepare(&self, sql: &str, params: &[Value]) -> StorageResult<String> {
        let params: Vec<Value> = params.iter().map(|value| self.fix_value(value)).collect();
        self.backend.lock().prepare(sql, &params)
    }

    /// Inserts a new row, returning the generated identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the row.
    pub fn insert(&self, table: &str, record: &Record) -> StorageResult<i64> {
        let record = self.fix_record(record);
        self.backend.lock().insert(table, &record)
    }

    /// Updates rows matching `filter`, returning the affected-row
    /// count. The fixup applies to `record` only, never to the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    pub fn update(&self, table: &str, record: &Record, filter: &Record) -> StorageResult<u64> {
        let record = self.fix_record(record);
        self.backend.lock().update(table, &record, filter)
    }

    /// Deletes rows matching `filter`, returning the affected-row
    /// count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete.
    pub fn delete(&self, table: &str, filter: &Record) -> StorageResult<u64> {
        self.backend.lock().delete(table, filter)
    }

    /// The backend's diagnostic for the most recent failed operation.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.backend.lock().last_error()
    }

    /// Executes `unit_of_work` within a transaction.
    ///
    /// The transaction is committed if the closure returns `Ok` and
    /// rolled back if it returns `Err`; the rollback failure, if any,
    /// never masks the unit of work's own error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Transaction`] wrapping the unit of work's
    /// error after a rollback, or the storage error from beginning or
    /// committing the transaction itself.
    pub fn transaction<T, F>(&self, unit_of_work: F) -> CoreResult<T>
    where
        F: FnOnce() -> CoreResult<T>,
    {
        self.backend.lock().begin()?;
        debug!("transaction started");

        match unit_of_work() {
            Ok(value) => {
                self.backend.lock().commit()?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(cause) => {
                let _ = self.backend.lock().rollback();
                debug!("transaction rolled back");
                Err(CoreError::transaction(cause))
            }
        }
    }

    fn fix_value(&self, value: &Value) -> Value {
        match value {
            Value::Null if self.quirks.null_as_text => Value::Text("NULL".to_string()),
            Value::Bool(b) if self.quirks.bool_as_int => Value::Integer(i64::from(*b)),
            other => other.clone(),
        }
    }

    fn fix_record(&self, record: &Record) -> Record {
        record
            .iter()
            .map(|(key, value)| (key.to_string(), self.fix_value(value)))
            .collect()
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("table_prefix", &self.table_prefix)
            .field("quirks", &self.quirks)
            .finish_non_exhaustive()
    }
}
