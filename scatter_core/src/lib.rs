// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed scatter plot engine.
//!
//! This crate owns the parts of a scatter plot that are independent of any
//! drawing backend:
//! - **Scales** map data values to positions, radii and colors. Each dimension
//!   keeps its domain and range separately.
//! - **Reconciliation** matches a new data array against the live marks by key
//!   and partitions it into enter, update and exit groups.
//! - **Transitions** give each moving mark a duration proportional to its
//!   distance from the centre of the data.
//!
//! Drawing happens behind the [`Canvas`] and [`Axis`] traits; [`ScatterPlot`]
//! drives them and reports what it issued as a [`RenderPass`].
//!
//! ```
//! # use kurbo::{Point, Size};
//! # use core::time::Duration;
//! use scatter_core::{Axis, Canvas, Datum, Key, MarkAttrs, ScaleLinear, ScatterConfig, ScatterPlot};
//!
//! struct NullCanvas;
//! impl Canvas for NullCanvas {
//!     fn size(&self) -> Size { Size::new(400.0, 300.0) }
//!     fn create_mark(&mut self, _: &Key, _: &MarkAttrs) {}
//!     fn update_mark(&mut self, _: &Key, _: &MarkAttrs, _: Duration) {}
//!     fn remove_mark(&mut self, _: &Key, _: Duration) {}
//!     fn bind_hover(&mut self, _: &Key) {}
//! }
//! struct NullAxis;
//! impl Axis for NullAxis {
//!     fn position(&mut self, _: Point) {}
//!     fn redraw(&mut self, _: &ScaleLinear, _: Option<Duration>) {}
//! }
//!
//! let data = [
//!     Datum::new().with("key", "a").with("x", 0.0).with("y", 0.0),
//!     Datum::new().with("key", "b").with("x", 10.0).with("y", 10.0),
//! ];
//! let mut plot = ScatterPlot::new(NullCanvas, NullAxis, NullAxis);
//! let pass = plot.initialize(&data, ScatterConfig::default()).unwrap();
//! assert_eq!(pass.partition.enter.len(), 2);
//! ```

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod color;
mod config;
mod datum;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod layout;
mod plot;
#[cfg(test)]
mod plot_tests;
mod reconcile;
mod scale;
mod surface;
mod transition;

pub use color::{category10, interpolate_colors, lerp_color};
pub use config::{ConfigOverrides, Dimension, DomainPadding, ScatterConfig};
pub use datum::{Datum, Key, KeyFn, Value};
pub use error::{Error, Result};
pub use layout::{Layout, X_LABEL_GUTTER};
pub use plot::{MarkTransition, Phase, RenderPass, ScatterPlot};
pub use reconcile::{KeyedDatum, Mark, MarkAttrs, MarkSet, Partition, reconcile};
pub use scale::{
    FillDomain, FillRange, FillScale, RangeSource, ScaleLinear, ScaleOrdinal, ScaleQuantize,
    ScaleSet, distinct_in_order, extent,
};
pub use surface::{Axis, Canvas, HoverHandler};
pub use transition::{DISTANCE_NORMALIZER, TransitionScheduler, TransitionSnapshot};
