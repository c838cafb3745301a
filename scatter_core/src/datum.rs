// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data records and mark identity.
//!
//! A [`Datum`] is an opaque record of named [`Value`]s. Field accessors in the
//! configuration pick out the values that drive each visual channel, and a
//! [`KeyFn`] derives the stable [`Key`] that ties a datum to its mark across
//! data updates.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use smallvec::SmallVec;

/// A single field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A numeric value.
    Number(f64),
    /// A string value.
    Text(String),
}

impl Value {
    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Returns the string value, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A data record: field name to [`Value`].
///
/// Records are usually small, so fields live inline and lookups are linear.
/// Inserting an existing field replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Datum {
    fields: SmallVec<[(String, Value); 6]>,
}

impl Datum {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, returning the record (builder style).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Returns the value of `field`, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Returns `field` as a finite number, if present.
    pub fn f64(&self, field: &str) -> Option<f64> {
        self.get(field)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    /// Iterates over `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Datum {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut datum = Self::new();
        for (field, value) in iter {
            datum.insert(field, value);
        }
        datum
    }
}

/// Stable mark identity.
///
/// Numbers are stored by their bit pattern with `-0.0` folded into `0.0`, so
/// keys can be hashed and compared exactly.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A numeric key (canonical `f64` bits).
    Number(u64),
    /// A string key.
    Text(Arc<str>),
}

impl Key {
    /// Creates a numeric key.
    pub fn number(value: f64) -> Self {
        let value = if value == 0.0 { 0.0 } else { value };
        Self::Number(value.to_bits())
    }

    /// Returns the numeric key value, if this is a numeric key.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(bits) => Some(f64::from_bits(*bits)),
            Self::Text(_) => None,
        }
    }
}

impl From<&Value> for Key {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(v) => Self::number(*v),
            Value::Text(s) => Self::Text(s.as_str().into()),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::number(f64::from(value))
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({self})")
    }
}

/// Derives a [`Key`] from a datum.
#[derive(Clone)]
pub enum KeyFn {
    /// Use the value of a field.
    Field(String),
    /// Use a custom function. Returning `None` marks the datum as unkeyed.
    Custom(Arc<dyn Fn(&Datum) -> Option<Key> + Send + Sync>),
}

impl KeyFn {
    /// Keys by the value of `field`.
    pub fn field(field: impl Into<String>) -> Self {
        Self::Field(field.into())
    }

    /// Keys by a custom function.
    pub fn custom(f: impl Fn(&Datum) -> Option<Key> + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Computes the key for `datum`.
    pub fn key(&self, datum: &Datum) -> Option<Key> {
        match self {
            Self::Field(field) => datum.get(field).map(Key::from),
            Self::Custom(f) => f(datum),
        }
    }

    /// A short label for error messages.
    pub(crate) fn label(&self) -> String {
        match self {
            Self::Field(field) => field.clone(),
            Self::Custom(_) => String::from("<key fn>"),
        }
    }
}

impl Default for KeyFn {
    fn default() -> Self {
        Self::field("key")
    }
}

impl fmt::Debug for KeyFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
