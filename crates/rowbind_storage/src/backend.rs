//! Storage backend trait definition.

use crate::error::StorageResult;
use rowbind_record::{Record, Value};

/// Per-adapter value-coercion capability flags.
///
/// Some stores mishandle native null or boolean column values. An
/// adapter that needs its inputs pre-coerced declares so here, and the
/// calling layer rewrites values before handing records over. The
/// default is no coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// Rewrite `Null` values to the literal text `"NULL"`.
    pub null_as_text: bool,
    /// Rewrite booleans to the integers `0`/`1`.
    pub bool_as_int: bool,
}

impl Quirks {
    /// Creates a quirks value with no coercion requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether nulls are rewritten to the `"NULL"` text sentinel.
    #[must_use]
    pub const fn null_as_text(mut self, value: bool) -> Self {
        self.null_as_text = value;
        self
    }

    /// Sets whether booleans are rewritten to `0`/`1`.
    #[must_use]
    pub const fn bool_as_int(mut self, value: bool) -> Self {
        self.bool_as_int = value;
        self
    }
}

/// A low-level storage backend for rowbind.
///
/// Storage backends are **row stores** over one exclusively-owned
/// connection. They execute text statements and structured row
/// operations; rowbind owns all name mapping and entity interpretation -
/// backends never see entities.
///
/// # Invariants
///
/// - `insert` returns the identifier generated for the new row
/// - `update`/`delete` return the number of rows affected
/// - `last_error` reports the diagnostic of the most recent failed
///   operation, or `None` if the last operation succeeded
/// - `begin`/`commit`/`rollback` are ambient per connection and
///   non-reentrant; at most one transaction is in flight at a time
///
/// # Implementors
///
/// - [`super::MemoryBackend`] - For testing and ephemeral storage
pub trait StorageBackend: Send {
    /// Executes a text statement, returning the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the statement.
    fn query(&mut self, sql: &str) -> StorageResult<u64>;

    /// Executes a text statement, returning the first result row.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the statement.
    fn fetch_row(&mut self, sql: &str) -> StorageResult<Option<Record>>;

    /// Executes a text statement, returning all result rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the statement.
    fn fetch_rows(&mut self, sql: &str) -> StorageResult<Vec<Record>>;

    /// Binds `params` into the `%s`/`%d`/`%f` placeholders of `sql`,
    /// returning the executable statement text.
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder count does not match
    /// `params`.
    fn prepare(&mut self, sql: &str, params: &[Value]) -> StorageResult<String>;

    /// Inserts a new row, returning the generated identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the row.
    fn insert(&mut self, table: &str, record: &Record) -> StorageResult<i64>;

    /// Updates rows matching `filter`, returning the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    fn update(&mut self, table: &str, record: &Record, filter: &Record) -> StorageResult<u64>;

    /// Deletes rows matching `filter`, returning the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete.
    fn delete(&mut self, table: &str, filter: &Record) -> StorageResult<u64>;

    /// The diagnostic of the most recent failed operation.
    fn last_error(&self) -> Option<String>;

    /// Begins a transaction on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction is already active.
    fn begin(&mut self) -> StorageResult<()>;

    /// Commits the active transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is active.
    fn commit(&mut self) -> StorageResult<()>;

    /// Rolls back the active transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is active.
    fn rollback(&mut self) -> StorageResult<()>;

    /// The value coercions this adapter needs from its callers.
    fn quirks(&self) -> Quirks {
        Quirks::default()
    }
}
