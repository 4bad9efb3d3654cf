//! Error types for rowbind core.

use rowbind_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in rowbind core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A mapper was constructed with no column/property pairs.
    #[error("column map must contain at least one column/property pair")]
    EmptyMap,

    /// Two columns in a mapper's table name the same property, so the
    /// property-to-column direction would be ambiguous.
    #[error("duplicate property name in column map: {property}")]
    DuplicateProperty {
        /// The property declared more than once.
        property: String,
    },

    /// A repository was constructed with a blank source name.
    #[error("repository source name must not be blank")]
    EmptySource,

    /// The mapper yields no usable primary-key property name.
    #[error("no usable primary-key property for entity {entity} backed by source {source}")]
    MissingPrimaryKey {
        /// The entity type being persisted.
        entity: &'static str,
        /// The resolved source name.
        source: String,
    },

    /// A column lookup was requested for a key absent from the map.
    #[error("column '{column}' does not exist in map")]
    UnknownColumn {
        /// The column that was looked up.
        column: String,
    },

    /// A property lookup was requested for a key absent from the map.
    #[error("property '{property}' does not exist in map")]
    UnknownProperty {
        /// The property that was looked up.
        property: String,
    },

    /// An entity reporting errors was handed to the persistence layer.
    #[error("entity failed validation: {messages}")]
    Validation {
        /// The entity's error messages, joined.
        messages: String,
    },

    /// A storage operation reported failure.
    #[error("persistence failed: {message}")]
    Persistence {
        /// The store's last diagnostic.
        message: String,
    },

    /// A unit of work failed and its transaction was rolled back.
    #[error("a storage error has occurred resulting in a rolled back transaction")]
    Transaction {
        /// The failure that forced the rollback.
        #[source]
        source: Box<CoreError>,
    },
}

impl CoreError {
    /// Creates a duplicate-property configuration error.
    pub fn duplicate_property(property: impl Into<String>) -> Self {
        Self::DuplicateProperty {
            property: property.into(),
        }
    }

    /// Creates a missing-primary-key configuration error.
    pub fn missing_primary_key(entity: &'static str, source: impl Into<String>) -> Self {
        Self::MissingPrimaryKey {
            entity,
            source: source.into(),
        }
    }

    /// Creates an unknown-column mapping error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Creates an unknown-property mapping error.
    pub fn unknown_property(property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            property: property.into(),
        }
    }

    /// Creates a validation error from joined entity messages.
    pub fn validation(messages: impl Into<String>) -> Self {
        Self::Validation {
            messages: messages.into(),
        }
    }

    /// Creates a persistence error from a store diagnostic.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Wraps the failure that forced a rollback.
    #[must_use]
    pub fn transaction(cause: CoreError) -> Self {
        Self::Transaction {
            source: Box::new(cause),
        }
    }
}
