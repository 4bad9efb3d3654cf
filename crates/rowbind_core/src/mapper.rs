//! Bidirectional column/property name mapping.

use crate::error::{CoreError, CoreResult};
use rowbind_record::Record;
use std::collections::HashMap;

/// The column-to-property table a mapper exposes to the hydrator.
pub type ColumnToPropertyMap = HashMap<String, String>;

/// An immutable association of column names to property names, plus the
/// name of the property holding the primary identity.
///
/// The two mapping directions are deliberately asymmetric:
///
/// - column→property ([`Mapper::map_columns_to_properties`]) is
///   **non-strict**: unknown columns pass through verbatim, so a
///   storage row with extra columns still hydrates.
/// - property→column ([`Mapper::map_properties_to_columns`]) is
///   **strict**: unknown properties are dropped, so a field that was
///   never declared in the map can never reach storage.
///
/// # Example
///
/// ```rust
/// use rowbind_core::{Mapper, Record, Value};
///
/// let mapper = Mapper::new([("date_created", "dateCreated")], "id").unwrap();
///
/// let row = Record::new().with("date_created", "20140401").with("id", 7);
/// let properties = mapper.map_columns_to_properties(&row);
///
/// assert_eq!(properties.get("dateCreated"), Some(&Value::Text("20140401".into())));
/// assert_eq!(properties.get("id"), Some(&Value::Integer(7)));
/// ```
#[derive(Debug, Clone)]
pub struct Mapper {
    /// column -> property
    columns: ColumnToPropertyMap,
    /// property -> column
    properties: HashMap<String, String>,
    primary_key: String,
}

impl Mapper {
    /// Creates a mapper from column/property pairs and the primary-key
    /// property name.
    ///
    /// A column given twice keeps its last property, matching flat-map
    /// construction semantics.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyMap`] if no pairs are given, and
    /// [`CoreError::DuplicateProperty`] if two columns name the same
    /// property (the property→column direction would be ambiguous).
    pub fn new<I, C, P>(map: I, primary_key_property: impl Into<String>) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (C, P)>,
        C: Into<String>,
        P: Into<String>,
    {
        let mut columns = ColumnToPropertyMap::new();
        let mut properties = HashMap::new();

        for (column, property) in map {
            let column = column.into();
            let property = property.into();

            if let Some(previous) = columns.insert(column.clone(), property.clone()) {
                properties.remove(&previous);
            }
            if properties.insert(property.clone(), column).is_some() {
                return Err(CoreError::duplicate_property(property));
            }
        }

        if columns.is_empty() {
            return Err(CoreError::EmptyMap);
        }

        Ok(Self {
            columns,
            properties,
            primary_key: primary_key_property.into(),
        })
    }

    /// The column-to-property table, for driving a hydrator.
    #[must_use]
    pub fn column_to_property_table(&self) -> &ColumnToPropertyMap {
        &self.columns
    }

    /// The name of the property holding the primary identity.
    #[must_use]
    pub fn primary_key_property(&self) -> &str {
        &self.primary_key
    }

    /// Maps a column-keyed record to a property-keyed record
    /// (non-strict: unknown columns pass through unchanged).
    #[must_use]
    pub fn map_columns_to_properties(&self, record: &Record) -> Record {
        record
            .iter()
            .map(|(key, value)| match self.columns.get(key) {
                Some(property) => (property.clone(), value.clone()),
                None => (key.to_string(), value.clone()),
            })
            .collect()
    }

    /// Maps a property-keyed record to a column-keyed record (strict:
    /// unknown properties are dropped).
    #[must_use]
    pub fn map_properties_to_columns(&self, record: &Record) -> Record {
        record
            .iter()
            .filter_map(|(key, value)| {
                self.properties
                    .get(key)
                    .map(|column| (column.clone(), value.clone()))
            })
            .collect()
    }

    /// Looks up the column mapped to `property`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProperty`] if the property is not in
    /// the map.
    pub fn column_by_property(&self, property: &str) -> CoreResult<&str> {
        self.properties
            .get(property)
            .map(String::as_str)
            .ok_or_else(|| CoreError::unknown_property(property))
    }

    /// Looks up the property mapped to `column`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownColumn`] if the column is not in the
    /// map.
    pub fn property_by_column(&self, column: &str) -> CoreResult<&str> {
        self.columns
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| CoreError::unknown_column(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rowbind_record::Value;

    fn date_mapper() -> Mapper {
        Mapper::new(
            [
                ("date_created", "dateCreated"),
                ("date_updated", "dateUpdated"),
            ],
            "id",
        )
        .unwrap()
    }

    #[test]
    fn empty_map_is_rejected() {
        let result = Mapper::new(Vec::<(String, String)>::new(), "id");
        assert!(matches!(result, Err(CoreError::EmptyMap)));
    }

    #[test]
    fn duplicate_property_is_rejected() {
        let result = Mapper::new([("created", "stamp"), ("updated", "stamp")], "id");

        match result {
            Err(CoreError::DuplicateProperty { property }) => assert_eq!(property, "stamp"),
            other => panic!("expected DuplicateProperty, got {other:?}"),
        }
    }

    #[test]
    fn repeated_column_keeps_last_property() {
        let mapper = Mapper::new([("created", "old"), ("created", "new")], "id").unwrap();

        assert_eq!(mapper.property_by_column("created").unwrap(), "new");
        assert!(mapper.column_by_property("old").is_err());
        assert_eq!(mapper.column_by_property("new").unwrap(), "created");
    }

    #[test]
    fn columns_to_properties_renames_and_passes_through() {
        let mapper = date_mapper();
        let row = Record::new()
            .with("id", 1232)
            .with("date_created", "20140401")
            .with("date_updated", "20140411");

        let mapped = mapper.map_columns_to_properties(&row);

        assert_eq!(mapped.get("id"), Some(&Value::Integer(1232)));
        assert_eq!(
            mapped.get("dateCreated"),
            Some(&Value::Text("20140401".into()))
        );
        assert_eq!(
            mapped.get("dateUpdated"),
            Some(&Value::Text("20140411".into()))
        );
        // Renamed keys do not survive under their storage names.
        assert!(!mapped.contains_key("date_created"));
        assert_eq!(mapped.len(), 3);
    }

    #[test]
    fn properties_to_columns_drops_unknown_keys() {
        let mapper = date_mapper();
        let properties = Record::new()
            .with("id", 1232)
            .with("dateCreated", "20140401")
            .with("dateUpdated", "20140411");

        let mapped = mapper.map_properties_to_columns(&properties);

        assert_eq!(
            mapped.get("date_created"),
            Some(&Value::Text("20140401".into()))
        );
        assert_eq!(
            mapped.get("date_updated"),
            Some(&Value::Text("20140411".into()))
        );
        // `id` is not declared in the map and must never reach storage.
        assert!(!mapped.contains_key("id"));
        assert_eq!(mapped.len(), 2);
    }

    #[test]
    fn round_trip_keeps_only_mapped_columns() {
        let mapper = Mapper::new([("a", "b")], "b").unwrap();
        let row = Record::new().with("a", "v").with("c", "w");

        let round = mapper.map_properties_to_columns(&mapper.map_columns_to_properties(&row));

        assert_eq!(round, Record::new().with("a", "v"));
    }

    #[test]
    fn mapping_preserves_input_order() {
        let mapper = date_mapper();
        let row = Record::new()
            .with("date_updated", 2)
            .with("id", 1)
            .with("date_created", 3);

        let mapped = mapper.map_columns_to_properties(&row);

        assert_eq!(
            mapped.keys().collect::<Vec<_>>(),
            vec!["dateUpdated", "id", "dateCreated"]
        );
    }

    #[test]
    fn point_lookups() {
        let mapper = date_mapper();

        assert_eq!(
            mapper.column_by_property("dateCreated").unwrap(),
            "date_created"
        );
        assert_eq!(
            mapper.property_by_column("date_created").unwrap(),
            "dateCreated"
        );
    }

    #[test]
    fn point_lookups_name_the_missing_key() {
        let mapper = date_mapper();

        match mapper.column_by_property("fdsa") {
            Err(CoreError::UnknownProperty { property }) => assert_eq!(property, "fdsa"),
            other => panic!("expected UnknownProperty, got {other:?}"),
        }
        match mapper.property_by_column("fdsa") {
            Err(CoreError::UnknownColumn { column }) => assert_eq!(column, "fdsa"),
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    proptest! {
        /// Strict-after-permissive acts as a filter down to mapped
        /// columns, whatever the input record contains.
        #[test]
        fn round_trip_filters_to_mapped_columns(
            keys in proptest::collection::vec("[a-e]", 0..8),
        ) {
            let mapper = Mapper::new([("a", "pa"), ("b", "pb")], "pa").unwrap();
            let record: Record = keys
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), i as i64))
                .collect();

            let round =
                mapper.map_properties_to_columns(&mapper.map_columns_to_properties(&record));

            for key in record.keys() {
                let mapped = key == "a" || key == "b";
                prop_assert_eq!(round.contains_key(key), mapped);
            }
            for key in round.keys() {
                prop_assert!(key == "a" || key == "b");
            }
        }
    }
}
