// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits implemented by a rendering backend.
//!
//! The engine never draws. It issues commands through [`Canvas`] and [`Axis`]
//! and forwards hover events to a [`HoverHandler`]. Commands carry target
//! attributes and a duration; animating toward the target is the backend's job,
//! and a new command for a mark that is still animating retargets it.

use core::time::Duration;

use kurbo::{Point, Size};

use crate::datum::{Datum, Key};
use crate::reconcile::MarkAttrs;
use crate::scale::ScaleLinear;

/// The surface marks are placed on.
pub trait Canvas {
    /// Current size in pixels.
    fn size(&self) -> Size;

    /// Creates a mark immediately with `attrs`.
    fn create_mark(&mut self, key: &Key, attrs: &MarkAttrs);

    /// Animates an existing mark to `attrs` over `duration`.
    fn update_mark(&mut self, key: &Key, attrs: &MarkAttrs, duration: Duration);

    /// Shrinks a mark to nothing over `duration`, then detaches it.
    fn remove_mark(&mut self, key: &Key, duration: Duration);

    /// Starts reporting hover events for a mark.
    ///
    /// The backend calls [`crate::ScatterPlot::hover_enter`] and
    /// [`crate::ScatterPlot::hover_leave`] with this key.
    fn bind_hover(&mut self, key: &Key);
}

/// A positional axis.
pub trait Axis {
    /// Moves the axis to `anchor` in canvas coordinates.
    fn position(&mut self, anchor: Point);

    /// Redraws ticks for `scale`, animated over `duration` when given.
    fn redraw(&mut self, scale: &ScaleLinear, duration: Option<Duration>);
}

/// Receives hover events, typically to show a tooltip.
pub trait HoverHandler {
    /// The pointer entered the mark for `key`.
    fn on_enter(&mut self, key: &Key, datum: &Datum);

    /// The pointer left the mark for `key`.
    fn on_leave(&mut self, key: &Key, datum: &Datum);
}

impl<F: FnMut(&Key, &Datum, bool)> HoverHandler for F {
    fn on_enter(&mut self, key: &Key, datum: &Datum) {
        self(key, datum, true);
    }

    fn on_leave(&mut self, key: &Key, datum: &Datum) {
        self(key, datum, false);
    }
}
