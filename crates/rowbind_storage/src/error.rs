//! Error types for storage operations.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store refused or failed an operation.
    #[error("storage rejected {op}: {message}")]
    Rejected {
        /// The operation that failed.
        op: &'static str,
        /// The store's diagnostic message.
        message: String,
    },

    /// `begin` was called while a transaction is already active.
    #[error("a transaction is already active on this connection")]
    TransactionActive,

    /// `commit` or `rollback` was called with no active transaction.
    #[error("no transaction is active on this connection")]
    NoActiveTransaction,

    /// A prepared statement's placeholder count does not match its
    /// parameters.
    #[error("statement expects {expected} parameters, {given} given")]
    ParameterCount {
        /// Placeholders found in the statement.
        expected: usize,
        /// Parameters supplied by the caller.
        given: usize,
    },
}

impl StorageError {
    /// Creates a rejection error for `op`.
    pub fn rejected(op: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            op,
            message: message.into(),
        }
    }
}
