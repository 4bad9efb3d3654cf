//! # rowbind storage
//!
//! Storage backend trait and implementations for rowbind.
//!
//! This crate provides the lowest-level execution abstraction for
//! rowbind. Storage backends own a connection to a relational store and
//! expose row-level operations on it - they know nothing about entities,
//! mappers or hydration.
//!
//! ## Design Principles
//!
//! - Backends are row stores: text statements in, [`rowbind_record::Record`]
//!   rows out
//! - One backend value models one connection; transactions are ambient
//!   per connection and non-reentrant
//! - Value-coercion workarounds are declared per adapter via [`Quirks`],
//!   never hardwired into callers
//!
//! ## Available Backends
//!
//! - [`MemoryBackend`] - In-memory tables for testing and ephemeral data
//!
//! ## Example
//!
//! ```rust
//! use rowbind_record::Record;
//! use rowbind_storage::{MemoryBackend, StorageBackend};
//!
//! let mut backend = MemoryBackend::new();
//! let id = backend.insert("toys", &Record::new().with("name", "sled")).unwrap();
//! assert_eq!(id, 1);
//! assert_eq!(backend.rows("toys").len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod memory;

pub use backend::{Quirks, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryBackend;
