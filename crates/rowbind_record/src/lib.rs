//! # rowbind record
//!
//! Dynamic value and flat record types for rowbind.
//!
//! This crate provides the lowest-level data model for rowbind. A
//! [`Value`] is a single storage cell; a [`Record`] is an
//! insertion-ordered flat map of names to values, representing either a
//! storage row (column-keyed) or a dehydrated entity (property-keyed).
//!
//! ## Design Principles
//!
//! - Records are plain data - they carry no schema or table knowledge
//! - Insertion order is preserved; every mapping operation downstream
//!   emits keys in input order
//! - Conversions into field types are explicit and fallible
//!
//! ## Example
//!
//! ```rust
//! use rowbind_record::{Record, Value};
//!
//! let row = Record::new()
//!     .with("id", 7)
//!     .with("screen_name", "ada");
//!
//! assert_eq!(row.get("screen_name"), Some(&Value::Text("ada".into())));
//! assert_eq!(i64::try_from(row.get("id").unwrap().clone()).unwrap(), 7);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod record;
mod value;

pub use error::ValueTypeError;
pub use record::Record;
pub use value::Value;
