// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for scatter plot operations.

extern crate alloc;

use alloc::string::String;

use crate::config::Dimension;
use crate::datum::Key;

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by scale, layout, reconciliation and widget operations.
///
/// Every failing widget operation leaves the previously rendered state untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An option is missing or out of range.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A datum does not yield a value for a required field (x, y or the key).
    #[error("datum {index} has no usable value for field `{field}`")]
    MissingField {
        /// Position of the datum in the data array.
        index: usize,
        /// The field (or key accessor) that failed.
        field: String,
    },

    /// A scale was invoked before both its domain and range were set.
    #[error("{dimension:?} scale used before its domain and range were set")]
    ScaleNotConfigured {
        /// The dimension whose scale was incomplete.
        dimension: Dimension,
    },

    /// The canvas leaves no usable chart area.
    #[error("no usable chart area in a {width}x{height} canvas")]
    LayoutNotReady {
        /// Canvas width.
        width: f64,
        /// Canvas height.
        height: f64,
    },

    /// Two data items in one update yield the same key.
    #[error("duplicate key {key} in data array")]
    DuplicateKey {
        /// The repeated key.
        key: Key,
    },
}

impl Error {
    /// Convenience constructor for [`Error::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_offending_item() {
        let err = Error::MissingField {
            index: 3,
            field: "x".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains('3'), "{msg}");
        assert!(msg.contains("`x`"), "{msg}");

        let err = Error::DuplicateKey {
            key: Key::from("a"),
        };
        assert!(err.to_string().contains("\"a\""));
    }

    #[test]
    fn layout_error_reports_canvas_size() {
        let err = Error::LayoutNotReady {
            width: 0.0,
            height: 400.0,
        };
        assert!(err.to_string().contains("0x400"));
    }
}
