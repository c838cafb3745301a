// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed reconciliation of rendered marks against a new data set.
//!
//! [`reconcile`] is a pure function: it never touches a canvas. The widget uses
//! its [`Partition`] to decide which marks to create, retarget, or remove, and
//! then rebuilds the [`MarkSet`] from the enter and update groups.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::Point;
use peniko::Color;

use crate::datum::{Datum, Key, KeyFn};
use crate::error::{Error, Result};

/// Visual attributes of a single mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkAttrs {
    /// Center in canvas coordinates.
    pub position: Point,
    /// Circle radius.
    pub radius: f64,
    /// Fill color.
    pub fill: Color,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// A rendered mark.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub key: Key,
    /// The datum the mark currently represents.
    pub datum: Datum,
    /// Target attributes last sent to the canvas.
    pub attrs: MarkAttrs,
}

/// The live marks, in data order, indexed by key.
#[derive(Clone, Debug, Default)]
pub struct MarkSet {
    marks: Vec<Mark>,
    index: HashMap<Key, usize>,
}

impl MarkSet {
    /// Creates an empty mark set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mark set from marks with distinct keys.
    ///
    /// A repeated key keeps only its last mark.
    pub fn from_marks(marks: impl IntoIterator<Item = Mark>) -> Self {
        let mut set = Self::new();
        for mark in marks {
            set.insert(mark);
        }
        set
    }

    fn insert(&mut self, mark: Mark) {
        match self.index.get(&mark.key) {
            Some(&i) => self.marks[i] = mark,
            None => {
                self.index.insert(mark.key.clone(), self.marks.len());
                self.marks.push(mark);
            }
        }
    }

    /// Returns the mark for `key`.
    pub fn get(&self, key: &Key) -> Option<&Mark> {
        self.index.get(key).map(|&i| &self.marks[i])
    }

    /// Returns `true` if a mark with `key` is live.
    pub fn contains(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates over marks in data order.
    pub fn iter(&self) -> core::slice::Iter<'_, Mark> {
        self.marks.iter()
    }

    /// Iterates over keys in data order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.marks.iter().map(|m| &m.key)
    }

    /// Number of live marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if no marks are live.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

impl<'a> IntoIterator for &'a MarkSet {
    type Item = &'a Mark;
    type IntoIter = core::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A datum paired with its key and its position in the data array.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedDatum {
    /// Index into the data array.
    pub index: usize,
    /// Key computed by the key function.
    pub key: Key,
}

/// Result of [`reconcile`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    /// Data whose key has no live mark, in data order.
    pub enter: Vec<KeyedDatum>,
    /// Data whose key has a live mark, in data order.
    pub update: Vec<KeyedDatum>,
    /// Live keys absent from the data, in mark-set order.
    pub exit: Vec<Key>,
}

impl Partition {
    /// Returns `true` when nothing enters or exits.
    pub fn is_stable(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }

    /// Enter and update entries merged back into data order.
    pub fn retained(&self) -> Vec<&KeyedDatum> {
        let mut all: Vec<&KeyedDatum> = self.enter.iter().chain(&self.update).collect();
        all.sort_unstable_by_key(|k| k.index);
        all
    }
}

/// Splits `data` into enter, update and exit groups relative to `old`.
///
/// Fails with [`Error::MissingField`] when a datum yields no key and with
/// [`Error::DuplicateKey`] when two data share one.
pub fn reconcile(old: &MarkSet, data: &[Datum], key_fn: &KeyFn) -> Result<Partition> {
    let mut partition = Partition::default();
    let mut seen: HashSet<Key> = HashSet::with_capacity(data.len());

    for (index, datum) in data.iter().enumerate() {
        let key = key_fn.key(datum).ok_or_else(|| Error::MissingField {
            index,
            field: key_fn.label(),
        })?;
        if !seen.insert(key.clone()) {
            return Err(Error::DuplicateKey { key });
        }
        let entry = KeyedDatum { index, key };
        if old.contains(&entry.key) {
            partition.update.push(entry);
        } else {
            partition.enter.push(entry);
        }
    }

    partition.exit = old.keys().filter(|k| !seen.contains(*k)).cloned().collect();

    log::debug!(
        "reconciled {} marks against {} data: {} enter, {} update, {} exit",
        old.len(),
        data.len(),
        partition.enter.len(),
        partition.update.len(),
        partition.exit.len()
    );
    Ok(partition)
}
