// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales and the per-dimension scale set.
//!
//! Concrete scales ([`ScaleLinear`], [`ScaleQuantize`], [`ScaleOrdinal`]) are
//! small immutable mappings. [`ScaleSet`] owns the domain and range of every
//! dimension separately, so recomputing one side (new data, a resize, a new
//! gradient) never discards the other, and only hands out a concrete scale once
//! both sides are known.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use hashbrown::HashMap;
use peniko::Color;

use crate::color::interpolate_colors;
use crate::config::{Dimension, DomainPadding, ScatterConfig};
use crate::datum::{Datum, Key, Value};
use crate::error::{Error, Result};
use crate::layout::Layout;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// A degenerate domain maps everything to the start of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns “nice-ish” tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let span = max - min;
    let step = nice_step(span / count.max(1) as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    // Ticks stay inside the domain so axes never label positions off the chart.
    let start = (min / step).ceil() * step;
    let stop = (max / step).floor() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    (0..=n).map(|i| start + step * i as f64).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Maps a continuous domain onto a finite list of outputs using equal-width bins.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleQuantize<T> {
    domain: (f64, f64),
    range: Vec<T>,
}

impl<T: Clone> ScaleQuantize<T> {
    /// Creates a quantize scale.
    pub fn new(domain: (f64, f64), range: Vec<T>) -> Self {
        Self { domain, range }
    }

    /// Returns the bin index for `x`, or `None` if the range is empty.
    ///
    /// Values outside the domain land in the first or last bin. A degenerate
    /// domain selects the middle bin.
    pub fn index(&self, x: f64) -> Option<usize> {
        let n = self.range.len();
        if n == 0 {
            return None;
        }
        let (d0, d1) = self.domain;
        if d1 <= d0 || d0.is_nan() || d1.is_nan() || x.is_nan() {
            return Some(n / 2);
        }
        let t = (x - d0) / (d1 - d0) * n as f64;
        let t = t.floor().clamp(0.0, (n - 1) as f64);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "clamped to [0, n - 1]"
        )]
        Some(t as usize)
    }

    /// Maps `x` to its output.
    pub fn map(&self, x: f64) -> Option<T> {
        self.index(x).map(|i| self.range[i].clone())
    }
}

/// Maps discrete categories onto a palette, cycling when categories outnumber it.
///
/// Categories with an explicit output bypass the palette.
#[derive(Clone, Debug)]
pub struct ScaleOrdinal<T> {
    domain: Vec<Key>,
    index: HashMap<Key, usize>,
    range: Vec<T>,
    fixed: HashMap<Key, T>,
}

impl<T: Clone> ScaleOrdinal<T> {
    /// Creates an ordinal scale. Repeated categories keep their first position.
    pub fn new(domain: Vec<Key>, range: Vec<T>) -> Self {
        let mut index = HashMap::with_capacity(domain.len());
        for (i, key) in domain.iter().enumerate() {
            index.entry(key.clone()).or_insert(i);
        }
        Self {
            domain,
            index,
            range,
            fixed: HashMap::new(),
        }
    }

    /// Pins categories to explicit outputs, checked before the palette.
    pub fn with_fixed(mut self, fixed: HashMap<Key, T>) -> Self {
        self.fixed = fixed;
        self
    }

    /// Returns the category list.
    pub fn domain(&self) -> &[Key] {
        &self.domain
    }

    /// Maps a category to its output; `None` for unknown categories or an empty range.
    pub fn map(&self, category: &Key) -> Option<T> {
        if let Some(out) = self.fixed.get(category) {
            return Some(out.clone());
        }
        if self.range.is_empty() {
            return None;
        }
        let i = *self.index.get(category)?;
        Some(self.range[i % self.range.len()].clone())
    }
}

/// Domain of the fill dimension.
#[derive(Clone, Debug, PartialEq)]
pub enum FillDomain {
    /// Distinct category values in first-seen order.
    Categories(Vec<Key>),
    /// Continuous `[min, max]` extent.
    Extent(f64, f64),
}

/// Range of the fill dimension.
#[derive(Clone, Debug, PartialEq)]
pub enum FillRange {
    /// A categorical palette plus explicitly colored categories.
    Palette {
        /// Colors cycled through in first-seen order.
        colors: Vec<Color>,
        /// Per-category colors that take precedence over `colors`.
        fixed: HashMap<Key, Color>,
    },
    /// A pre-interpolated gradient.
    Gradient(Vec<Color>),
}

/// A resolved fill scale.
#[derive(Clone, Debug)]
pub enum FillScale {
    /// Categorical fill.
    Ordinal(ScaleOrdinal<Color>),
    /// Continuous fill.
    Quantize(ScaleQuantize<Color>),
}

impl FillScale {
    /// Maps a datum's fill value to a color.
    pub fn map(&self, value: &Value) -> Option<Color> {
        match self {
            Self::Ordinal(s) => s.map(&Key::from(value)),
            Self::Quantize(s) => value.as_f64().and_then(|v| s.map(v)),
        }
    }
}

/// Source of an output range passed to [`ScaleSet::set_range`].
#[derive(Clone, Copy, Debug)]
pub enum RangeSource<'a> {
    /// Chart-area geometry, for [`Dimension::X`] and [`Dimension::Y`].
    Layout(&'a Layout),
    /// Radius bounds, for [`Dimension::Radius`].
    Radius {
        /// Smallest radius.
        min: f64,
        /// Largest radius.
        max: f64,
    },
    /// A categorical palette, for [`Dimension::Fill`].
    Palette {
        /// Colors cycled through in first-seen order.
        colors: &'a [Color],
        /// Per-category colors that take precedence over `colors`.
        fixed: &'a HashMap<Key, Color>,
    },
    /// A three-stop gradient, for [`Dimension::Fill`].
    Gradient {
        /// Low color.
        lo: Color,
        /// Middle color.
        mid: Color,
        /// High color.
        hi: Color,
        /// Number of interpolated steps.
        steps: usize,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct LinearChannel {
    domain: Option<(f64, f64)>,
    range: Option<(f64, f64)>,
}

impl LinearChannel {
    fn resolve(&self, dimension: Dimension) -> Result<ScaleLinear> {
        match (self.domain, self.range) {
            (Some(domain), Some(range)) => Ok(ScaleLinear::new(domain, range)),
            _ => Err(Error::ScaleNotConfigured { dimension }),
        }
    }
}

/// Domains and ranges for every dimension of the plot.
#[derive(Clone, Debug, Default)]
pub struct ScaleSet {
    x: LinearChannel,
    y: LinearChannel,
    radius: LinearChannel,
    fill_domain: Option<FillDomain>,
    fill_range: Option<FillRange>,
}

impl ScaleSet {
    /// Creates an empty scale set; every scale starts unconfigured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the domain of `dimension` from `data`.
    ///
    /// Positional domains are widened per [`ScatterConfig::domain_padding`]; the
    /// radius-proportional strategy needs `layout` and fails with
    /// [`Error::LayoutNotReady`] when the chart area cannot fit a maximum-size
    /// mark. An empty data set leaves positional domains unchanged.
    pub fn set_domain(
        &mut self,
        dimension: Dimension,
        data: &[Datum],
        config: &ScatterConfig,
        layout: Option<&Layout>,
    ) -> Result<()> {
        match dimension {
            Dimension::X | Dimension::Y => {
                let field = if dimension == Dimension::X {
                    &config.x_key
                } else {
                    &config.y_key
                };
                let Some((min, max)) = extent(data.iter().filter_map(|d| d.f64(field))) else {
                    return Ok(());
                };
                let buffer = positional_buffer(dimension, max - min, config, layout)?;
                let channel = if dimension == Dimension::X {
                    &mut self.x
                } else {
                    &mut self.y
                };
                channel.domain = Some((min - buffer, max + buffer));
            }
            Dimension::Radius => {
                self.radius.domain = config
                    .radius_key
                    .as_deref()
                    .and_then(|field| extent(data.iter().filter_map(|d| d.f64(field))));
            }
            Dimension::Fill => {
                self.fill_domain = if config.categorical {
                    config.fill_key_categorical.as_deref().map(|field| {
                        FillDomain::Categories(distinct_in_order(
                            data.iter().filter_map(|d| d.get(field)).map(Key::from),
                        ))
                    })
                } else {
                    extent(data.iter().filter_map(|d| continuous_fill_value(d, config)))
                        .map(|(min, max)| FillDomain::Extent(min, max))
                };
            }
        }
        Ok(())
    }

    /// Sets the output range of `dimension`.
    pub fn set_range(&mut self, dimension: Dimension, source: RangeSource<'_>) -> Result<()> {
        match (dimension, source) {
            (Dimension::X, RangeSource::Layout(layout)) => {
                self.x.range = Some(layout.x_range());
            }
            (Dimension::Y, RangeSource::Layout(layout)) => {
                self.y.range = Some(layout.y_range());
            }
            (Dimension::Radius, RangeSource::Radius { min, max }) => {
                self.radius.range = Some((min, max));
            }
            (Dimension::Fill, RangeSource::Palette { colors, fixed }) => {
                if colors.is_empty() {
                    return Err(Error::configuration("fill palette must not be empty"));
                }
                self.fill_range = Some(FillRange::Palette {
                    colors: colors.to_vec(),
                    fixed: fixed.clone(),
                });
            }
            (
                Dimension::Fill,
                RangeSource::Gradient {
                    lo,
                    mid,
                    hi,
                    steps,
                },
            ) => {
                if steps == 0 {
                    return Err(Error::configuration("gradient needs at least one step"));
                }
                self.fill_range = Some(FillRange::Gradient(interpolate_colors(lo, mid, hi, steps)));
            }
            (dimension, source) => {
                return Err(Error::configuration(alloc::format!(
                    "{dimension:?} range cannot be taken from {source:?}"
                )));
            }
        }
        Ok(())
    }

    /// Sets the domain of every dimension.
    pub fn set_domains(
        &mut self,
        data: &[Datum],
        config: &ScatterConfig,
        layout: Option<&Layout>,
    ) -> Result<()> {
        self.set_domain(Dimension::Radius, data, config, layout)?;
        self.set_domain(Dimension::Fill, data, config, layout)?;
        self.set_domain(Dimension::X, data, config, layout)?;
        self.set_domain(Dimension::Y, data, config, layout)
    }

    /// Sets the radius and fill ranges from configuration.
    pub fn set_style_ranges(&mut self, config: &ScatterConfig) -> Result<()> {
        self.set_range(
            Dimension::Radius,
            RangeSource::Radius {
                min: config.min_radius,
                max: config.max_radius,
            },
        )?;
        let fill = if config.categorical {
            RangeSource::Palette {
                colors: &config.categorical_palette,
                fixed: &config.category_colors,
            }
        } else {
            RangeSource::Gradient {
                lo: config.lo_color,
                mid: config.mid_color,
                hi: config.hi_color,
                steps: config.num_gradient_steps,
            }
        };
        self.set_range(Dimension::Fill, fill)
    }

    /// Sets both positional ranges from `layout`.
    pub fn set_positional_ranges(&mut self, layout: &Layout) -> Result<()> {
        self.set_range(Dimension::X, RangeSource::Layout(layout))?;
        self.set_range(Dimension::Y, RangeSource::Layout(layout))
    }

    /// Returns the x scale.
    pub fn x(&self) -> Result<ScaleLinear> {
        self.x.resolve(Dimension::X)
    }

    /// Returns the y scale.
    pub fn y(&self) -> Result<ScaleLinear> {
        self.y.resolve(Dimension::Y)
    }

    /// Returns the radius scale.
    pub fn radius(&self) -> Result<ScaleLinear> {
        self.radius.resolve(Dimension::Radius)
    }

    /// Returns the fill scale.
    ///
    /// A categorical domain needs a palette range and a continuous domain a
    /// gradient range; any other pairing counts as unconfigured.
    pub fn fill(&self) -> Result<FillScale> {
        match (&self.fill_domain, &self.fill_range) {
            (Some(FillDomain::Categories(domain)), Some(FillRange::Palette { colors, fixed })) => {
                Ok(FillScale::Ordinal(
                    ScaleOrdinal::new(domain.clone(), colors.clone()).with_fixed(fixed.clone()),
                ))
            }
            (Some(FillDomain::Extent(min, max)), Some(FillRange::Gradient(ramp))) => Ok(
                FillScale::Quantize(ScaleQuantize::new((*min, *max), ramp.clone())),
            ),
            _ => Err(Error::ScaleNotConfigured {
                dimension: Dimension::Fill,
            }),
        }
    }

    /// Returns the current fill domain.
    pub fn fill_domain(&self) -> Option<&FillDomain> {
        self.fill_domain.as_ref()
    }

    /// Returns the current domain of a linear dimension.
    ///
    /// Always `None` for [`Dimension::Fill`]; see [`ScaleSet::fill_domain`].
    pub fn linear_domain(&self, dimension: Dimension) -> Option<(f64, f64)> {
        match dimension {
            Dimension::X => self.x.domain,
            Dimension::Y => self.y.domain,
            Dimension::Radius => self.radius.domain,
            Dimension::Fill => None,
        }
    }
}

fn positional_buffer(
    dimension: Dimension,
    span: f64,
    config: &ScatterConfig,
    layout: Option<&Layout>,
) -> Result<f64> {
    match config.domain_padding {
        DomainPadding::Fixed(b) => Ok(b),
        DomainPadding::RadiusProportional => {
            let Some(layout) = layout else {
                return Err(Error::LayoutNotReady {
                    width: 0.0,
                    height: 0.0,
                });
            };
            let extent = if dimension == Dimension::X {
                layout.chart.width()
            } else {
                layout.chart.height()
            };
            let radius = config.largest_radius();
            let usable = extent - 2.0 * radius;
            if usable.is_nan() || usable <= 0.0 {
                return Err(Error::LayoutNotReady {
                    width: layout.canvas.width,
                    height: layout.canvas.height,
                });
            }
            if span == 0.0 {
                return Ok(1.0);
            }
            // Solve `b * extent / (span + 2b) == radius` for `b`.
            Ok(radius * span / usable)
        }
    }
}

/// Returns the `(min, max)` of finite values, or `None` if there are none.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

/// Deduplicates keys, keeping the order of first occurrence.
pub fn distinct_in_order(keys: impl IntoIterator<Item = Key>) -> Vec<Key> {
    let mut seen = hashbrown::HashSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// The continuous fill input for a datum: the configured field, or its
/// distance from the origin when magnitude fill is enabled.
pub(crate) fn continuous_fill_value(datum: &Datum, config: &ScatterConfig) -> Option<f64> {
    match config.fill_key_continuous.as_deref() {
        Some(field) => datum.f64(field),
        None if config.fill_by_magnitude => {
            let x = datum.f64(&config.x_key)?;
            let y = datum.f64(&config.y_key)?;
            Some((x * x + y * y).sqrt())
        }
        None => None,
    }
}
