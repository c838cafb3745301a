// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart-area layout.
//!
//! The canvas is split into a label gutter along the left edge (y-axis tick
//! labels), a label gutter along the bottom edge (x-axis tick labels), padding on
//! the two far edges, and the chart area that receives the marks:
//!
//! ```text
//!  gutter_y            chart                  padding
//! +--------+---------------------------------+-------+
//! |        |                                 |       | padding
//! |        +---------------------------------+       |
//! |        |                                 |       |
//! |        |          marks live here        |       |
//! |        |                                 |       |
//! |        +---------------------------------+       |
//! |        |    x tick labels (gutter_x)     |       |
//! +--------+---------------------------------+-------+
//! ```

use kurbo::{Point, Rect, Size};

use crate::error::{Error, Result};

/// Height reserved below the chart area for x-axis tick labels.
pub const X_LABEL_GUTTER: f64 = 20.0;

/// Output of [`Layout::compute`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    /// Canvas size the layout was computed for.
    pub canvas: Size,
    /// Width of the y-label gutter (left edge).
    pub y_label_gutter: f64,
    /// Height of the x-label gutter (bottom edge).
    pub x_label_gutter: f64,
    /// Padding applied on the top and right edges.
    pub padding: f64,
    /// The chart area in canvas coordinates.
    pub chart: Rect,
}

impl Layout {
    /// Computes the layout for a canvas.
    ///
    /// The y-label gutter is `font_size` wide. Fails with
    /// [`Error::LayoutNotReady`] when the resulting chart area is empty.
    pub fn compute(canvas: Size, font_size: f64, padding: f64) -> Result<Self> {
        let y_label_gutter = font_size.max(0.0);
        let x_label_gutter = X_LABEL_GUTTER;
        let padding = padding.max(0.0);

        let chart = Rect::new(
            y_label_gutter,
            padding,
            canvas.width - padding,
            canvas.height - x_label_gutter,
        );
        // Written so that NaN sizes also fail.
        if !(chart.width() > 0.0 && chart.height() > 0.0) {
            return Err(Error::LayoutNotReady {
                width: canvas.width,
                height: canvas.height,
            });
        }

        Ok(Self {
            canvas,
            y_label_gutter,
            x_label_gutter,
            padding,
            chart,
        })
    }

    /// Chart-area origin; positional scale outputs are offsets from here.
    pub fn anchor(&self) -> Point {
        self.chart.origin()
    }

    /// Where the x axis is drawn (bottom-left corner of the chart area).
    pub fn x_axis_anchor(&self) -> Point {
        Point::new(self.chart.x0, self.chart.y1)
    }

    /// Where the y axis is drawn (top-left corner of the chart area).
    pub fn y_axis_anchor(&self) -> Point {
        Point::new(self.chart.x0, self.chart.y0)
    }

    /// Output range for the x scale, in chart-local pixels.
    pub fn x_range(&self) -> (f64, f64) {
        (0.0, self.chart.width())
    }

    /// Output range for the y scale, in chart-local pixels.
    ///
    /// Inverted: the largest data value maps to the top edge.
    pub fn y_range(&self) -> (f64, f64) {
        (self.chart.height(), 0.0)
    }

    /// Converts a chart-local offset into canvas coordinates.
    pub fn to_canvas(&self, local: Point) -> Point {
        self.anchor() + local.to_vec2()
    }
}
