//! Per-entity-type persistence orchestration.

use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::gateway::Gateway;
use crate::hydrator::Hydrator;
use crate::manager::DataManager;
use crate::mapper::Mapper;
use rowbind_record::{Record, Value};
use rowbind_storage::StorageError;
use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Outcome of a successful [`Repository::persist`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// The entity was new; a row was inserted and this identifier was
    /// generated and assigned to the entity.
    Inserted {
        /// The backend-generated identifier.
        id: i64,
    },
    /// The entity already had an identity; its row was updated.
    Updated {
        /// The affected-row count reported by the backend.
        rows: u64,
    },
}

/// Orchestrates hydration and persistence for one entity type backed by
/// one named source.
///
/// A repository binds a shared [`DataManager`], a [`Mapper`] and a
/// source name to an entity type `E`. Fresh entities are produced from
/// `E::default()` during hydration; `PhantomData` carries the type, no
/// prototype state is ever copied.
///
/// `persist` disambiguates insert from update on the entity's identity
/// state: an entity without identity is inserted inside a gateway
/// transaction and receives the generated identifier; an entity with
/// identity is updated in place by primary key.
pub struct Repository<E> {
    manager: Arc<DataManager>,
    mapper: Mapper,
    source: String,
    _entity: PhantomData<E>,
}

impl<E: Entity + Default> Repository<E> {
    /// Creates a repository over `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySource`] if `source` is blank.
    pub fn new(
        manager: Arc<DataManager>,
        mapper: Mapper,
        source: impl Into<String>,
    ) -> CoreResult<Self> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(CoreError::EmptySource);
        }

        Ok(Self {
            manager,
            mapper,
            source,
            _entity: PhantomData,
        })
    }

    /// The gateway backing this repository.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        self.manager.gateway()
    }

    /// The hydrator backing this repository.
    #[must_use]
    pub fn hydrator(&self) -> &Hydrator {
        self.manager.hydrator()
    }

    /// The mapper bound to this repository.
    #[must_use]
    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// The unprefixed source name.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The source name with the gateway's table prefix applied.
    #[must_use]
    pub fn qualified_source(&self) -> String {
        format!("{}{}", self.gateway().table_prefix(), self.source)
    }

    /// Hydrates one storage row into a fresh entity.
    #[must_use]
    pub fn hydrate(&self, record: &Record) -> E {
        self.hydrator()
            .hydrate(E::default(), record, self.mapper.column_to_property_table())
    }

    /// Hydrates a result set into fresh entities, one per row.
    ///
    /// An empty result set yields an empty vector.
    #[must_use]
    pub fn hydrate_result_set(&self, rows: &[Record]) -> Vec<E> {
        rows.iter().map(|row| self.hydrate(row)).collect()
    }

    /// Persists an entity, inserting or updating on its identity state.
    ///
    /// A new entity (no identity) is dehydrated, mapped to columns,
    /// inserted inside a gateway transaction, and assigned the
    /// generated identifier. An entity with identity is updated by
    /// primary key. The entity's identity is never touched on any
    /// failure path.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] if the entity reports errors (no
    ///   storage operation is attempted)
    /// - [`CoreError::MissingPrimaryKey`] if the mapper yields no
    ///   usable primary-key property name
    /// - [`CoreError::Persistence`] if the backend rejects the update
    /// - [`CoreError::Transaction`] if the backend rejects the insert
    ///   and the transaction is rolled back
    pub fn persist(&self, entity: &mut E) -> CoreResult<Persisted> {
        if !entity.is_valid() {
            return Err(CoreError::validation(entity.errors().join("\n")));
        }

        let properties = self.hydrator().dehydrate(entity);
        let mut columns = self.mapper.map_properties_to_columns(&properties);
        let table = self.qualified_source();

        let pk_property = self.mapper.primary_key_property().trim();
        if pk_property.is_empty() {
            return Err(CoreError::missing_primary_key(type_name::<E>(), table));
        }
        // An unmapped primary-key property doubles as its own column
        // name.
        let pk_column = self
            .mapper
            .column_by_property(pk_property)
            .unwrap_or(pk_property)
            .to_string();

        match entity.identity() {
            Some(id) => {
                debug!(source = %table, "updating entity by primary key");
                let filter = Record::new().with(pk_column, id);
                let rows = self.update(&table, &columns, &filter)?;
                Ok(Persisted::Updated { rows })
            }
            None => {
                // Some stores turn an empty primary-key cell into an
                // invalid column value; drop the cell and let the store
                // generate the identifier.
                if columns.get(&pk_column).is_some_and(Value::is_empty_like) {
                    columns.remove(&pk_column);
                }

                debug!(source = %table, "inserting new entity");
                let id = self
                    .gateway()
                    .transaction(|| self.insert(&table, &columns))?;
                entity.set_identity(Value::Integer(id));
                Ok(Persisted::Inserted { id })
            }
        }
    }

    /// Updates rows in `table` matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Persistence`] carrying the gateway's last
    /// diagnostic if the backend rejects the update.
    pub fn update(&self, table: &str, record: &Record, filter: &Record) -> CoreResult<u64> {
        self.gateway()
            .update(table, record, filter)
            .map_err(|err| self.persistence_error(err))
    }

    /// Inserts a row into `table`, returning the generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Persistence`] carrying the gateway's last
    /// diagnostic if the backend rejects the insert.
    pub fn insert(&self, table: &str, record: &Record) -> CoreResult<i64> {
        self.gateway()
            .insert(table, record)
            .map_err(|err| self.persistence_error(err))
    }

    /// Deletes rows in `table` matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Persistence`] carrying the gateway's last
    /// diagnostic if the backend rejects the delete.
    pub fn delete(&self, table: &str, filter: &Record) -> CoreResult<u64> {
        self.gateway()
            .delete(table, filter)
            .map_err(|err| self.persistence_error(err))
    }

    fn persistence_error(&self, err: StorageError) -> CoreError {
        let message = self
            .gateway()
            .last_error()
            .unwrap_or_else(|| err.to_string());
        CoreError::persistence(message)
    }
}

impl<E> std::fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("source", &self.source)
            .field("entity", &type_name::<E>())
            .finish_non_exhaustive()
    }
}
