//! # rowbind core
//!
//! Record-to-entity mapping and persistence engine for rowbind.
//!
//! This crate provides:
//! - Entity capability traits ([`Validatable`], [`Identifiable`],
//!   [`FieldAccess`]) in place of runtime reflection
//! - [`Mapper`] - the bidirectional column↔property naming table
//! - [`Hydrator`] - stateless record/entity translation
//! - [`Gateway`] - the storage execution boundary with its transaction
//!   scope
//! - [`DataManager`] - the gateway/hydrator composition root
//! - [`Repository`] - per-entity-type hydrate/persist/delete
//!   orchestration
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rowbind_core::{
//!     DataManager, Errors, FieldAccess, Gateway, Hydrator, Identifiable, Mapper,
//!     Persisted, Repository, Validatable, Value,
//! };
//! use rowbind_storage::MemoryBackend;
//!
//! #[derive(Debug, Default)]
//! struct Toy {
//!     id: Option<i64>,
//!     name: String,
//!     errors: Errors,
//! }
//!
//! impl Validatable for Toy {
//!     fn add_error(&mut self, message: impl Into<String>) {
//!         self.errors.add(message);
//!     }
//!     fn errors(&self) -> &[String] {
//!         self.errors.as_slice()
//!     }
//! }
//!
//! impl Identifiable for Toy {
//!     fn identity(&self) -> Option<Value> {
//!         self.id.map(Value::from)
//!     }
//!     fn set_identity(&mut self, id: Value) {
//!         self.id = id.as_integer();
//!     }
//! }
//!
//! impl FieldAccess for Toy {
//!     fn field_names(&self) -> &'static [&'static str] {
//!         &["id", "name"]
//!     }
//!     fn field(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "id" => Some(Value::from(self.id)),
//!             "name" => Some(Value::from(self.name.clone())),
//!             _ => None,
//!         }
//!     }
//!     fn set_field(&mut self, name: &str, value: Value) -> bool {
//!         match name {
//!             "id" => {
//!                 self.id = value.as_integer();
//!                 true
//!             }
//!             "name" => {
//!                 self.name = value.as_text().unwrap_or_default().to_string();
//!                 true
//!             }
//!             _ => false,
//!         }
//!     }
//! }
//!
//! # fn main() -> rowbind_core::CoreResult<()> {
//! let manager = Arc::new(DataManager::new(
//!     Gateway::new(Box::new(MemoryBackend::new()), "wp_"),
//!     Hydrator::new(),
//! ));
//! let mapper = Mapper::new([("id", "id"), ("toy_name", "name")], "id")?;
//! let repository: Repository<Toy> = Repository::new(manager, mapper, "toys")?;
//!
//! let mut toy = Toy { name: "sled".into(), ..Toy::default() };
//! let outcome = repository.persist(&mut toy)?;
//!
//! assert!(matches!(outcome, Persisted::Inserted { id: 1 }));
//! assert_eq!(toy.id, Some(1));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod error;
mod gateway;
mod hydrator;
mod manager;
mod mapper;
mod repository;

pub use entity::{Entity, Errors, FieldAccess, Identifiable, Validatable};
pub use error::{CoreError, CoreResult};
pub use gateway::Gateway;
pub use hydrator::Hydrator;
pub use manager::DataManager;
pub use mapper::{ColumnToPropertyMap, Mapper};
pub use repository::{Persisted, Repository};

// Re-export the data model so downstream callers need only one import.
pub use rowbind_record::{Record, Value, ValueTypeError};
