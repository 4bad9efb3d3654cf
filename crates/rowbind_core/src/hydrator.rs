//! Record/entity translation engine.

use crate::entity::FieldAccess;
use crate::mapper::ColumnToPropertyMap;
use rowbind_record::Record;

/// Stateless translation engine between flat records and entity fields.
///
/// One hydrator serves any number of entity types and repositories; the
/// active column-to-property table is borrowed per call from whichever
/// mapper is in play, so nothing here is ever reconfigured between
/// calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hydrator;

impl Hydrator {
    /// Creates a hydrator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Fills an entity's fields from a flat record.
    ///
    /// Each key is first translated through `columns` when it names a
    /// known column; the (possibly translated) name is then written via
    /// the entity's field registry. Keys that match no registered field
    /// are silently skipped - a row may always carry more columns than
    /// the entity declares.
    ///
    /// Returns the same entity, mutated.
    pub fn hydrate<E: FieldAccess>(
        &self,
        mut entity: E,
        record: &Record,
        columns: &ColumnToPropertyMap,
    ) -> E {
        for (key, value) in record.iter() {
            let name = columns.get(key).map(String::as_str).unwrap_or(key);
            entity.set_field(name, value.clone());
        }
        entity
    }

    /// Extracts a flat property-keyed record from an entity's fields.
    ///
    /// The exact inverse of [`Hydrator::hydrate`] with respect to field
    /// naming: every registered field is read through the registry and
    /// emitted under its property name. No column translation happens
    /// here - that is the mapper's job, applied afterward by the
    /// repository.
    pub fn dehydrate<E: FieldAccess>(&self, entity: &E) -> Record {
        let mut record = Record::new();
        for name in entity.field_names() {
            if let Some(value) = entity.field(name) {
                record.insert(*name, value);
            }
        }
        record
    }
}
