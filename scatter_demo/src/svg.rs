// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG backend for `scatter_demo`.
//!
//! Commands are applied immediately: a snapshot shows every mark at its target
//! attributes. Durations are only logged.

use std::collections::HashMap;
use std::time::Duration;

use kurbo::{Point, Size};
use peniko::Color;
use scatter_core::{Axis, Canvas, Key, MarkAttrs, ScaleLinear};

/// Which edge of the chart an axis labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AxisOrient {
    Bottom,
    Left,
}

#[derive(Debug)]
pub(crate) struct SvgCanvas {
    size: Size,
    marks: HashMap<Key, (u64, MarkAttrs)>,
    next_seq: u64,
}

impl SvgCanvas {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            marks: HashMap::new(),
            next_seq: 0,
        }
    }

    pub(crate) fn set_size(&mut self, width: f64, height: f64) {
        self.size = Size::new(width, height);
    }
}

impl Canvas for SvgCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn create_mark(&mut self, key: &Key, attrs: &MarkAttrs) {
        self.marks.insert(key.clone(), (self.next_seq, *attrs));
        self.next_seq += 1;
    }

    fn update_mark(&mut self, key: &Key, attrs: &MarkAttrs, duration: Duration) {
        log::trace!("svg: {key} -> {:?} over {duration:?}", attrs.position);
        if let Some((_, slot)) = self.marks.get_mut(key) {
            *slot = *attrs;
        }
    }

    fn remove_mark(&mut self, key: &Key, duration: Duration) {
        log::trace!("svg: remove {key} over {duration:?}");
        self.marks.remove(key);
    }

    fn bind_hover(&mut self, _key: &Key) {}
}

#[derive(Debug)]
pub(crate) struct SvgAxis {
    orient: AxisOrient,
    anchor: Point,
    font_size: f64,
    /// `(offset along the axis, label)`.
    ticks: Vec<(f64, String)>,
    length: f64,
}

impl SvgAxis {
    pub(crate) fn new(orient: AxisOrient, font_size: f64) -> Self {
        Self {
            orient,
            anchor: Point::ZERO,
            font_size,
            ticks: Vec::new(),
            length: 0.0,
        }
    }
}

impl Axis for SvgAxis {
    fn position(&mut self, anchor: Point) {
        self.anchor = anchor;
    }

    fn redraw(&mut self, scale: &ScaleLinear, duration: Option<Duration>) {
        log::debug!(
            "svg: redraw {:?} axis for domain {:?} ({duration:?})",
            self.orient,
            scale.domain()
        );
        let (r0, r1) = scale.range();
        self.length = (r1 - r0).abs();
        self.ticks = scale
            .ticks(5)
            .into_iter()
            .map(|v| (scale.map(v), format_tick(v)))
            .collect();
    }
}

fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

pub(crate) fn render(canvas: &SvgCanvas, x_axis: &SvgAxis, y_axis: &SvgAxis) -> String {
    let Size { width, height } = canvas.size;
    let mut out = String::new();

    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
    ));
    out.push('\n');

    write_axis(&mut out, x_axis);
    write_axis(&mut out, y_axis);

    let mut marks: Vec<_> = canvas.marks.iter().collect();
    marks.sort_by_key(|(_, (seq, _))| *seq);
    for (key, (_, attrs)) in marks {
        out.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}""#,
            attrs.position.x, attrs.position.y, attrs.radius
        ));
        write_fill(&mut out, attrs.fill, attrs.opacity);
        out.push('>');
        out.push_str(&format!("<title>{}</title>", escape_xml(&key.to_string())));
        out.push_str("</circle>\n");
    }

    out.push_str("</svg>\n");
    out
}

fn write_axis(out: &mut String, axis: &SvgAxis) {
    let Point { x, y } = axis.anchor;
    let fs = axis.font_size;
    match axis.orient {
        AxisOrient::Bottom => {
            out.push_str(&format!(
                r#"<line x1="{x}" y1="{y}" x2="{}" y2="{y}" stroke="black"/>"#,
                x + axis.length
            ));
            out.push('\n');
            for (offset, label) in &axis.ticks {
                let tx = x + offset;
                out.push_str(&format!(
                    r#"<text x="{tx:.2}" y="{:.2}" font-size="{fs}" text-anchor="middle">{}</text>"#,
                    y + fs + 2.0,
                    escape_xml(label)
                ));
                out.push('\n');
            }
        }
        AxisOrient::Left => {
            out.push_str(&format!(
                r#"<line x1="{x}" y1="{y}" x2="{x}" y2="{}" stroke="black"/>"#,
                y + axis.length
            ));
            out.push('\n');
            for (offset, label) in &axis.ticks {
                let ty = y + offset;
                out.push_str(&format!(
                    r#"<text x="{:.2}" y="{ty:.2}" font-size="{fs}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                    x - 2.0,
                    escape_xml(label)
                ));
                out.push('\n');
            }
        }
    }
}

fn write_fill(out: &mut String, color: Color, opacity: f64) {
    let rgba = color.to_rgba8();
    out.push_str(&format!(
        r##" fill="#{:02x}{:02x}{:02x}""##,
        rgba.r, rgba.g, rgba.b
    ));
    let alpha = f64::from(rgba.a) / 255.0 * opacity;
    if alpha < 1.0 {
        out.push_str(&format!(r#" fill-opacity="{alpha:.3}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
