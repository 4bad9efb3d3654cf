//! Entity capability traits.
//!
//! A persisted type implements three capabilities: [`Validatable`]
//! (an accumulating validation error list), [`Identifiable`] (a nullable
//! identity assigned by the persistence layer on first insert), and
//! [`FieldAccess`] (an explicit field registry the hydrator drives, in
//! place of runtime reflection). [`Entity`] bundles the three.

use rowbind_record::Value;

/// Append-only container for an entity's validation errors.
///
/// Entities embed one of these and delegate their [`Validatable`]
/// implementation to it. Messages keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    messages: Vec<String>,
}

impl Errors {
    /// Creates an empty error container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, returning `&mut self` for chaining.
    pub fn add(&mut self, message: impl Into<String>) -> &mut Self {
        self.messages.push(message.into());
        self
    }

    /// Whether no messages have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of recorded messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// The recorded messages, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.messages
    }

    /// Joins all messages with `separator`.
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.messages.join(separator)
    }
}

/// An object that accumulates validation errors.
///
/// Invariant: `is_valid() == !has_errors()`, which the provided methods
/// guarantee for any implementation of `errors()`.
pub trait Validatable {
    /// Appends a validation error message.
    fn add_error(&mut self, message: impl Into<String>);

    /// The recorded messages, in insertion order. Empty when valid.
    fn errors(&self) -> &[String];

    /// Whether any error has been recorded.
    fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    /// Whether no error has been recorded.
    fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

/// An object carrying a nullable storage identity.
///
/// Fresh entities report `None`; the persistence layer assigns the
/// backend-generated identity after a successful insert. Which field
/// backs the identity is the entity's own concern.
pub trait Identifiable {
    /// The current identity value, if any.
    fn identity(&self) -> Option<Value>;

    /// Assigns the identity value.
    fn set_identity(&mut self, id: Value);
}

/// Explicit field registry for hydration.
///
/// Implemented once per entity type, this replaces reflective field
/// access: the registered getter and setter bodies decide how each
/// named field is read and written, so accessor logic stays inside the
/// entity.
pub trait FieldAccess {
    /// The names of every hydratable field, in dehydration order.
    fn field_names(&self) -> &'static [&'static str];

    /// Reads the field called `name`.
    ///
    /// Returns `None` only for unregistered names; an absent value is
    /// represented as [`Value::Null`].
    fn field(&self, name: &str) -> Option<Value>;

    /// Writes `value` into the field called `name`.
    ///
    /// Returns `false` for unregistered names, in which case the value
    /// is discarded.
    fn set_field(&mut self, name: &str, value: Value) -> bool;
}

/// A persistable business object: validatable, identifiable, and open
/// to hydration through its field registry.
pub trait Entity: Validatable + Identifiable + FieldAccess {}

impl<T: Validatable + Identifiable + FieldAccess> Entity for T {}
