// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scatter plot widget.
//!
//! Every operation is planned in full before anything is committed: options
//! are validated, data is checked and reconciled, scales are recomputed on a
//! copy, and target attributes and durations are computed. Only then are the
//! widget's state replaced and commands sent to the collaborators. A failing
//! operation therefore leaves the previous render untouched.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use kurbo::{Point, Size};
use peniko::Color;

use crate::config::{ConfigOverrides, Dimension, ScatterConfig};
use crate::datum::{Datum, Key, Value};
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::reconcile::{Mark, MarkAttrs, MarkSet, Partition, reconcile};
use crate::scale::{FillScale, ScaleLinear, ScaleSet, continuous_fill_value};
use crate::surface::{Axis, Canvas, HoverHandler};
use crate::transition::{TransitionScheduler, TransitionSnapshot};

/// Which reconciliation group a transition belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// A newly created mark.
    Enter,
    /// A mark that was already live.
    Update,
    /// A mark being removed.
    Exit,
}

/// A command issued for one mark.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkTransition {
    /// Mark identity.
    pub key: Key,
    /// Reconciliation group.
    pub phase: Phase,
    /// Target attributes; `None` for exits.
    pub target: Option<MarkAttrs>,
    /// Animation duration.
    pub duration: Duration,
}

/// Summary of the commands one operation issued.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPass {
    /// Key partition of the new data against the previous marks.
    pub partition: Partition,
    /// Per-mark commands, exits first, then retained marks in data order.
    pub transitions: Vec<MarkTransition>,
    /// `true` when rendering waits for a usable layout.
    pub deferred: bool,
}

impl RenderPass {
    fn deferred(partition: Partition) -> Self {
        Self {
            partition,
            transitions: Vec::new(),
            deferred: true,
        }
    }

    /// Returns the command for `key`, if one was issued.
    pub fn transition(&self, key: &Key) -> Option<&MarkTransition> {
        self.transitions.iter().find(|t| &t.key == key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timing {
    /// Durations scale with distance from the data centroid.
    DataDriven,
    /// Every mark uses the uniform duration.
    Uniform,
}

/// Everything an operation will commit, computed without side effects.
struct Plan {
    config: ScatterConfig,
    scales: ScaleSet,
    layout: Layout,
    partition: Partition,
    retained: Vec<(Mark, Phase, Duration)>,
    exits: Vec<(Key, Duration)>,
    fade_in: bool,
}

/// Resolved scales used to compute mark attributes.
struct Encoder<'a> {
    config: &'a ScatterConfig,
    layout: &'a Layout,
    x: ScaleLinear,
    y: ScaleLinear,
    radius: Option<ScaleLinear>,
    fill: Option<FillScale>,
}

impl Encoder<'_> {
    fn attrs(&self, datum: &Datum, point: Point) -> MarkAttrs {
        let local = Point::new(self.x.map(point.x), self.y.map(point.y));
        MarkAttrs {
            position: self.layout.to_canvas(local),
            radius: self.radius(datum),
            fill: self.fill(datum),
            opacity: self.config.default_opacity,
        }
    }

    fn radius(&self, datum: &Datum) -> f64 {
        let value = self.config.radius_key.as_deref().and_then(|f| datum.f64(f));
        match (value, &self.radius) {
            (Some(v), Some(scale)) => scale.map(v),
            _ => self.config.default_radius,
        }
    }

    fn fill(&self, datum: &Datum) -> Color {
        let value = if self.config.categorical {
            self.config
                .fill_key_categorical
                .as_deref()
                .and_then(|f| datum.get(f))
                .cloned()
        } else {
            continuous_fill_value(datum, self.config).map(Value::Number)
        };
        value
            .zip(self.fill.as_ref())
            .and_then(|(v, scale)| scale.map(&v))
            .unwrap_or(self.config.default_fill)
    }
}

/// Returns the data-space position of `datum`.
fn data_point(datum: &Datum, config: &ScatterConfig) -> Option<Point> {
    Some(Point::new(
        datum.f64(&config.x_key)?,
        datum.f64(&config.y_key)?,
    ))
}

/// Returns the data-space position of every datum, failing on the first one
/// without finite x and y values.
fn check_positions(data: &[Datum], config: &ScatterConfig) -> Result<Vec<Point>> {
    data.iter()
        .enumerate()
        .map(|(index, datum)| {
            let coord = |field: &String| {
                datum.f64(field).ok_or_else(|| Error::MissingField {
                    index,
                    field: field.clone(),
                })
            };
            Ok(Point::new(coord(&config.x_key)?, coord(&config.y_key)?))
        })
        .collect()
}

/// A keyed scatter plot bound to a canvas and two axes.
pub struct ScatterPlot<C: Canvas, A: Axis> {
    canvas: C,
    x_axis: A,
    y_axis: A,
    hover: Option<Box<dyn HoverHandler>>,
    config: ScatterConfig,
    scales: ScaleSet,
    layout: Option<Layout>,
    size: Size,
    marks: MarkSet,
    data: Vec<Datum>,
    initialized: bool,
    pending: bool,
}

impl<C: Canvas, A: Axis> fmt::Debug for ScatterPlot<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatterPlot")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("marks", &self.marks.len())
            .field("data", &self.data.len())
            .field("initialized", &self.initialized)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<C: Canvas, A: Axis> ScatterPlot<C, A> {
    /// Creates an uninitialized plot.
    pub fn new(canvas: C, x_axis: A, y_axis: A) -> Self {
        let size = canvas.size();
        Self {
            canvas,
            x_axis,
            y_axis,
            hover: None,
            config: ScatterConfig::default(),
            scales: ScaleSet::new(),
            layout: None,
            size,
            marks: MarkSet::new(),
            data: Vec::new(),
            initialized: false,
            pending: false,
        }
    }

    /// First render.
    ///
    /// Every datum enters at its target attributes with zero opacity and fades
    /// in over the uniform duration. Calling this again discards the current
    /// marks and scales and starts over.
    ///
    /// When the canvas has no usable chart area the data and configuration are
    /// kept and the returned pass is `deferred`; the next successful
    /// [`ScatterPlot::resize`] renders.
    pub fn initialize(&mut self, data: &[Datum], config: ScatterConfig) -> Result<RenderPass> {
        config.validate()?;
        let points = check_positions(data, &config)?;
        let fresh = MarkSet::new();
        let partition = reconcile(&fresh, data, &config.key_fn)?;

        let size = self.canvas.size();
        let plan = match Layout::compute(size, config.font_size, config.padding) {
            Ok(layout) => Some(self.plan(
                &fresh,
                ScaleSet::new(),
                data,
                &points,
                config.clone(),
                layout,
                Timing::Uniform,
            )?),
            Err(Error::LayoutNotReady { .. }) => None,
            Err(err) => return Err(err),
        };

        let stale: Vec<Key> = self.marks.keys().cloned().collect();
        for key in &stale {
            self.canvas.remove_mark(key, Duration::ZERO);
        }
        self.marks = MarkSet::new();
        self.layout = None;
        self.size = size;
        self.initialized = true;
        match plan {
            Some(plan) => {
                self.data = data.to_vec();
                log::debug!("initialized scatter plot with {} data", data.len());
                Ok(self.commit(plan))
            }
            None => {
                self.scales = ScaleSet::new();
                self.defer(data, config, size);
                Ok(RenderPass::deferred(partition))
            }
        }
    }

    /// Replaces the data, optionally applying configuration overrides first.
    ///
    /// Marks are matched by key: new keys enter, known keys move to their new
    /// targets, and missing keys exit. Durations scale with each mark's distance
    /// from the centroid of the new data.
    ///
    /// Rendering is deferred only while the canvas has no usable chart area.
    /// Any other failure, including overrides whose radii cannot fit the chart,
    /// leaves the plot unchanged.
    pub fn update_data(
        &mut self,
        data: &[Datum],
        overrides: Option<ConfigOverrides>,
    ) -> Result<RenderPass> {
        self.ensure_initialized()?;
        let config = match overrides {
            Some(o) => self.config.apply(o),
            None => self.config.clone(),
        };
        self.rerender(data, config, Timing::DataDriven)
    }

    /// Rebinds one dimension to another field and re-renders the current data.
    pub fn update_field(&mut self, dimension: Dimension, field: &str) -> Result<RenderPass> {
        self.ensure_initialized()?;
        log::debug!("rebinding {dimension:?} to `{field}`");
        let config = self.config.with_field(dimension, field);
        let data = self.data.clone();
        self.rerender(&data, config, Timing::DataDriven)
    }

    /// Replaces the gradient colors.
    ///
    /// Under continuous fill every mark is recolored over the uniform duration.
    /// Under categorical fill the colors are stored for later and nothing is
    /// redrawn.
    pub fn update_colors(&mut self, lo: Color, mid: Color, hi: Color) -> Result<RenderPass> {
        self.ensure_initialized()?;
        let config = self.config.clone().with_gradient(lo, mid, hi);
        config.validate()?;
        if config.categorical || self.layout.is_none() || self.pending {
            self.config = config;
            return Ok(RenderPass {
                deferred: self.pending,
                ..RenderPass::default()
            });
        }
        let data = self.data.clone();
        self.rerender(&data, config, Timing::Uniform)
    }

    /// Recomputes the layout for a new canvas size and retargets every mark.
    ///
    /// Fails with [`Error::LayoutNotReady`] when the new size leaves no usable
    /// chart area; the previous layout is kept. A deferred first render happens
    /// here.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<RenderPass> {
        self.ensure_initialized()?;
        let size = Size::new(width, height);
        let layout = Layout::compute(size, self.config.font_size, self.config.padding)?;
        let points = check_positions(&self.data, &self.config)?;
        let timing = if self.pending {
            Timing::DataDriven
        } else {
            Timing::Uniform
        };
        let plan = self.plan(
            &self.marks,
            self.scales.clone(),
            &self.data,
            &points,
            self.config.clone(),
            layout,
            timing,
        )?;
        self.size = size;
        log::debug!("resized scatter plot to {width}x{height}");
        Ok(self.commit(plan))
    }

    /// Registers the handler that receives hover events.
    pub fn set_hover_handler(&mut self, handler: impl HoverHandler + 'static) {
        self.hover = Some(Box::new(handler));
    }

    /// Removes the hover handler.
    pub fn clear_hover_handler(&mut self) {
        self.hover = None;
    }

    /// Forwards a pointer-enter event for `key`. Returns `false` if no live
    /// mark or handler matched.
    pub fn hover_enter(&mut self, key: &Key) -> bool {
        let (Some(handler), Some(mark)) = (self.hover.as_mut(), self.marks.get(key)) else {
            return false;
        };
        handler.on_enter(key, &mark.datum);
        true
    }

    /// Forwards a pointer-leave event for `key`.
    pub fn hover_leave(&mut self, key: &Key) -> bool {
        let (Some(handler), Some(mark)) = (self.hover.as_mut(), self.marks.get(key)) else {
            return false;
        };
        handler.on_leave(key, &mark.datum);
        true
    }

    /// Live marks in data order.
    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    /// Current scales.
    pub fn scales(&self) -> &ScaleSet {
        &self.scales
    }

    /// Current layout; `None` before the first usable size.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Current configuration.
    pub fn config(&self) -> &ScatterConfig {
        &self.config
    }

    /// Current data.
    pub fn data(&self) -> &[Datum] {
        &self.data
    }

    /// `true` while rendering waits for a usable layout.
    pub fn is_deferred(&self) -> bool {
        self.pending
    }

    /// The canvas.
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// The canvas, mutably.
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// The x and y axes.
    pub fn axes(&self) -> (&A, &A) {
        (&self.x_axis, &self.y_axis)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::configuration("scatter plot is not initialized"))
        }
    }

    fn defer(&mut self, data: &[Datum], config: ScatterConfig, size: Size) {
        log::warn!(
            "deferring render: no usable chart area in a {}x{} canvas",
            size.width,
            size.height
        );
        self.data = data.to_vec();
        self.config = config;
        self.pending = true;
    }

    /// Shared path of the data-driven operations and color remaps.
    fn rerender(
        &mut self,
        data: &[Datum],
        config: ScatterConfig,
        timing: Timing,
    ) -> Result<RenderPass> {
        config.validate()?;
        let points = check_positions(data, &config)?;
        let partition = reconcile(&self.marks, data, &config.key_fn)?;

        // Only a canvas without a usable chart area defers. Any failure while
        // planning against a usable layout is returned with no state change.
        let layout = match self.layout {
            Some(layout) => layout,
            None => match Layout::compute(self.size, config.font_size, config.padding) {
                Ok(layout) => layout,
                Err(Error::LayoutNotReady { .. }) => {
                    self.defer(data, config, self.size);
                    return Ok(RenderPass::deferred(partition));
                }
                Err(err) => return Err(err),
            },
        };
        let plan = self.plan(
            &self.marks,
            self.scales.clone(),
            data,
            &points,
            config,
            layout,
            timing,
        )?;
        self.data = data.to_vec();
        Ok(self.commit(plan))
    }

    /// Computes scales, targets and durations without touching any state.
    fn plan(
        &self,
        old: &MarkSet,
        mut scales: ScaleSet,
        data: &[Datum],
        points: &[Point],
        config: ScatterConfig,
        layout: Layout,
        timing: Timing,
    ) -> Result<Plan> {
        let partition = reconcile(old, data, &config.key_fn)?;

        scales.set_domains(data, &config, Some(&layout))?;
        scales.set_positional_ranges(&layout)?;
        scales.set_style_ranges(&config)?;

        let scheduler =
            TransitionScheduler::new(&config, TransitionSnapshot::from_points(points));
        let fade_in = old.is_empty();

        let mut retained = Vec::with_capacity(data.len());
        if !data.is_empty() {
            let encoder = Encoder {
                config: &config,
                layout: &layout,
                x: scales.x()?,
                y: scales.y()?,
                radius: scales.radius().ok(),
                fill: scales.fill().ok(),
            };
            for entry in partition.retained() {
                let datum = &data[entry.index];
                let point = points[entry.index];
                let phase = if old.contains(&entry.key) {
                    Phase::Update
                } else {
                    Phase::Enter
                };
                let duration = match timing {
                    Timing::DataDriven if !fade_in => scheduler.duration_for(point),
                    _ => scheduler.uniform(),
                };
                let mark = Mark {
                    key: entry.key.clone(),
                    datum: datum.clone(),
                    attrs: encoder.attrs(datum, point),
                };
                retained.push((mark, phase, duration));
            }
        }

        let exits = partition
            .exit
            .iter()
            .map(|key| {
                let duration = match (timing, data.is_empty()) {
                    (Timing::DataDriven, false) => old
                        .get(key)
                        .and_then(|m| data_point(&m.datum, &config))
                        .map(|p| scheduler.duration_for(p))
                        .unwrap_or_else(|| scheduler.uniform()),
                    _ => scheduler.uniform(),
                };
                (key.clone(), duration)
            })
            .collect();

        Ok(Plan {
            config,
            scales,
            layout,
            partition,
            retained,
            exits,
            fade_in,
        })
    }

    /// Replaces state with `plan` and issues its commands.
    fn commit(&mut self, plan: Plan) -> RenderPass {
        let Plan {
            config,
            scales,
            layout,
            partition,
            retained,
            exits,
            fade_in,
        } = plan;

        let mut transitions = Vec::with_capacity(exits.len() + retained.len());
        for (key, duration) in exits {
            log::trace!("remove {key} over {duration:?}");
            self.canvas.remove_mark(&key, duration);
            transitions.push(MarkTransition {
                key,
                phase: Phase::Exit,
                target: None,
                duration,
            });
        }

        let mut marks = Vec::with_capacity(retained.len());
        for (mark, phase, duration) in retained {
            if phase == Phase::Enter {
                let initial = if fade_in {
                    MarkAttrs {
                        opacity: 0.0,
                        ..mark.attrs
                    }
                } else {
                    MarkAttrs {
                        radius: 0.0,
                        ..mark.attrs
                    }
                };
                log::trace!("create {}", mark.key);
                self.canvas.create_mark(&mark.key, &initial);
                self.canvas.bind_hover(&mark.key);
            }
            log::trace!("update {} over {duration:?}", mark.key);
            self.canvas.update_mark(&mark.key, &mark.attrs, duration);
            transitions.push(MarkTransition {
                key: mark.key.clone(),
                phase,
                target: Some(mark.attrs),
                duration,
            });
            marks.push(mark);
        }

        self.redraw_axes(&scales, &layout, &config);

        log::debug!(
            "rendered {} marks ({} entered, {} exited)",
            marks.len(),
            partition.enter.len(),
            partition.exit.len()
        );
        self.marks = MarkSet::from_marks(marks);
        self.scales = scales;
        self.config = config;
        self.layout = Some(layout);
        self.pending = false;

        RenderPass {
            partition,
            transitions,
            deferred: false,
        }
    }

    /// Repositions the axes when the layout moved and redraws those whose
    /// scale changed.
    fn redraw_axes(&mut self, scales: &ScaleSet, layout: &Layout, config: &ScatterConfig) {
        let first = self.layout.is_none();
        let moved = self.layout.as_ref() != Some(layout);
        if moved {
            self.x_axis.position(layout.x_axis_anchor());
            self.y_axis.position(layout.y_axis_anchor());
        }
        let duration = if first || !config.transitions_enabled {
            None
        } else {
            Some(config.uniform_duration)
        };
        if let Ok(x) = scales.x()
            && (moved || self.scales.x().ok() != Some(x))
        {
            self.x_axis.redraw(&x, duration);
        }
        if let Ok(y) = scales.y()
            && (moved || self.scales.y().ok() != Some(y))
        {
            self.y_axis.redraw(&y, duration);
        }
    }
}

