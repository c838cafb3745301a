// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget configuration.
//!
//! [`ScatterConfig`] enumerates every recognized option with its default and is
//! validated once per operation. [`ConfigOverrides`] carries a partial set of
//! replacements that [`crate::ScatterPlot::update_data`] applies atomically.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use hashbrown::HashMap;
use peniko::Color;
use peniko::color::palette::css;

use crate::color::category10;
use crate::datum::{Key, KeyFn};
use crate::error::{Error, Result};

/// A visual channel driven by a scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Circle radius.
    Radius,
    /// Fill color.
    Fill,
}

/// How positional domains are widened beyond the data extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DomainPadding {
    /// Widen by a fixed amount in data units on both sides.
    Fixed(f64),
    /// Widen just enough that a mark of maximum radius centred on an extreme
    /// value stays inside the chart area.
    #[default]
    RadiusProportional,
}

/// Full scatter plot configuration.
#[derive(Clone, Debug)]
pub struct ScatterConfig {
    /// Field providing the x value (required).
    pub x_key: String,
    /// Field providing the y value (required).
    pub y_key: String,
    /// Optional field providing the radius value.
    pub radius_key: Option<String>,
    /// Optional field providing a categorical fill value.
    pub fill_key_categorical: Option<String>,
    /// Optional field providing a continuous fill value.
    pub fill_key_continuous: Option<String>,
    /// Selects categorical (`true`) or continuous (`false`) fill.
    pub categorical: bool,
    /// For continuous fill without a field, color by `sqrt(x² + y²)`.
    pub fill_by_magnitude: bool,
    /// Smallest radius produced by the radius scale.
    pub min_radius: f64,
    /// Largest radius produced by the radius scale.
    pub max_radius: f64,
    /// Radius used when no radius field is configured or a datum lacks it.
    pub default_radius: f64,
    /// Fill used when no fill field applies to a datum.
    pub default_fill: Color,
    /// Low end of the continuous gradient.
    pub lo_color: Color,
    /// Midpoint of the continuous gradient.
    pub mid_color: Color,
    /// High end of the continuous gradient.
    pub hi_color: Color,
    /// Number of discrete steps in the continuous gradient.
    pub num_gradient_steps: usize,
    /// Palette for categorical fill, cycled when categories outnumber it.
    pub categorical_palette: Vec<Color>,
    /// Explicit colors for individual categories, taking precedence over the
    /// palette.
    pub category_colors: HashMap<Key, Color>,
    /// Resting opacity of every mark.
    pub default_opacity: f64,
    /// Mark identity.
    pub key_fn: KeyFn,
    /// When `false`, every transition has zero duration.
    pub transitions_enabled: bool,
    /// Positional domain buffer strategy.
    pub domain_padding: DomainPadding,
    /// Axis label font size; also the y-label gutter width.
    pub font_size: f64,
    /// Padding on the far (top and right) edges of the chart area.
    pub padding: f64,
    /// Minimum duration of a data-driven transition.
    pub base_delay: Duration,
    /// Extra duration given to the mark farthest from the centroid.
    pub animation_budget: Duration,
    /// Duration of non-data-driven transitions (resize, color remap, fade-in).
    pub uniform_duration: Duration,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            x_key: String::from("x"),
            y_key: String::from("y"),
            radius_key: None,
            fill_key_categorical: None,
            fill_key_continuous: None,
            categorical: false,
            fill_by_magnitude: false,
            min_radius: 2.0,
            max_radius: 10.0,
            default_radius: 5.0,
            default_fill: css::STEEL_BLUE,
            lo_color: Color::from_rgba8(0x33, 0x66, 0xcc, 0xff),
            mid_color: css::LIGHT_GRAY,
            hi_color: Color::from_rgba8(0x10, 0x96, 0x18, 0xff),
            num_gradient_steps: 256,
            categorical_palette: category10(),
            category_colors: HashMap::new(),
            default_opacity: 0.5,
            key_fn: KeyFn::default(),
            transitions_enabled: true,
            domain_padding: DomainPadding::default(),
            font_size: 10.0,
            padding: 30.0,
            base_delay: Duration::ZERO,
            animation_budget: Duration::from_millis(1000),
            uniform_duration: Duration::from_millis(1000),
        }
    }
}

impl ScatterConfig {
    /// Creates a configuration reading positions from `x_key` and `y_key`.
    pub fn new(x_key: impl Into<String>, y_key: impl Into<String>) -> Self {
        Self {
            x_key: x_key.into(),
            y_key: y_key.into(),
            ..Self::default()
        }
    }

    /// Sets the radius field.
    pub fn with_radius_key(mut self, field: impl Into<String>) -> Self {
        self.radius_key = Some(field.into());
        self
    }

    /// Colors marks by a categorical field.
    pub fn with_categorical_fill(mut self, field: impl Into<String>) -> Self {
        self.fill_key_categorical = Some(field.into());
        self.categorical = true;
        self
    }

    /// Colors marks by a continuous field.
    pub fn with_continuous_fill(mut self, field: impl Into<String>) -> Self {
        self.fill_key_continuous = Some(field.into());
        self.categorical = false;
        self
    }

    /// Colors marks by distance from the origin (continuous fill, no field).
    pub fn with_magnitude_fill(mut self) -> Self {
        self.fill_by_magnitude = true;
        self.categorical = false;
        self
    }

    /// Sets the radius scale output range.
    pub fn with_radius_range(mut self, min_radius: f64, max_radius: f64) -> Self {
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        self
    }

    /// Sets the radius used without a radius field.
    pub fn with_default_radius(mut self, radius: f64) -> Self {
        self.default_radius = radius;
        self
    }

    /// Sets the continuous gradient colors.
    pub fn with_gradient(mut self, lo: Color, mid: Color, hi: Color) -> Self {
        self.lo_color = lo;
        self.mid_color = mid;
        self.hi_color = hi;
        self
    }

    /// Sets the number of gradient steps.
    pub fn with_gradient_steps(mut self, steps: usize) -> Self {
        self.num_gradient_steps = steps;
        self
    }

    /// Sets the categorical palette.
    pub fn with_palette(mut self, palette: impl Into<Vec<Color>>) -> Self {
        self.categorical_palette = palette.into();
        self
    }

    /// Pins `category` to `color` under categorical fill.
    pub fn with_category_color(mut self, category: impl Into<Key>, color: Color) -> Self {
        self.category_colors.insert(category.into(), color);
        self
    }

    /// Sets the resting opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.default_opacity = opacity;
        self
    }

    /// Sets the key function.
    pub fn with_key_fn(mut self, key_fn: KeyFn) -> Self {
        self.key_fn = key_fn;
        self
    }

    /// Enables or disables transitions.
    pub fn with_transitions(mut self, enabled: bool) -> Self {
        self.transitions_enabled = enabled;
        self
    }

    /// Sets the positional domain buffer strategy.
    pub fn with_domain_padding(mut self, padding: DomainPadding) -> Self {
        self.domain_padding = padding;
        self
    }

    /// Sets font size and far-edge padding used by the layout.
    pub fn with_layout(mut self, font_size: f64, padding: f64) -> Self {
        self.font_size = font_size;
        self.padding = padding;
        self
    }

    /// Sets the data-driven transition timing.
    pub fn with_timing(mut self, base_delay: Duration, animation_budget: Duration) -> Self {
        self.base_delay = base_delay;
        self.animation_budget = animation_budget;
        self
    }

    /// Sets the duration of non-data-driven transitions.
    pub fn with_uniform_duration(mut self, duration: Duration) -> Self {
        self.uniform_duration = duration;
        self
    }

    /// Returns the field currently bound to `dimension`, if any.
    ///
    /// For [`Dimension::Fill`] this is the field selected by `categorical`.
    pub fn field(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::X => Some(self.x_key.as_str()),
            Dimension::Y => Some(self.y_key.as_str()),
            Dimension::Radius => self.radius_key.as_deref(),
            Dimension::Fill if self.categorical => self.fill_key_categorical.as_deref(),
            Dimension::Fill => self.fill_key_continuous.as_deref(),
        }
    }

    /// Returns a copy with `dimension` bound to `field`.
    pub fn with_field(&self, dimension: Dimension, field: &str) -> Self {
        let mut next = self.clone();
        let field = String::from(field);
        match dimension {
            Dimension::X => next.x_key = field,
            Dimension::Y => next.y_key = field,
            Dimension::Radius => next.radius_key = Some(field),
            Dimension::Fill if next.categorical => next.fill_key_categorical = Some(field),
            Dimension::Fill => next.fill_key_continuous = Some(field),
        }
        next
    }

    /// The largest radius any mark can take.
    pub fn largest_radius(&self) -> f64 {
        if self.radius_key.is_some() {
            self.max_radius.max(self.default_radius)
        } else {
            self.default_radius
        }
    }

    /// Returns a copy with `overrides` applied.
    pub fn apply(&self, o: ConfigOverrides) -> Self {
        let mut next = self.clone();
        if let Some(v) = o.x_key {
            next.x_key = v;
        }
        if let Some(v) = o.y_key {
            next.y_key = v;
        }
        if let Some(v) = o.radius_key {
            next.radius_key = v;
        }
        if let Some(v) = o.fill_key_categorical {
            next.fill_key_categorical = v;
        }
        if let Some(v) = o.fill_key_continuous {
            next.fill_key_continuous = v;
        }
        if let Some(v) = o.categorical {
            next.categorical = v;
        }
        if let Some(v) = o.fill_by_magnitude {
            next.fill_by_magnitude = v;
        }
        if let Some(v) = o.min_radius {
            next.min_radius = v;
        }
        if let Some(v) = o.max_radius {
            next.max_radius = v;
        }
        if let Some(v) = o.default_radius {
            next.default_radius = v;
        }
        if let Some(v) = o.default_fill {
            next.default_fill = v;
        }
        if let Some(v) = o.lo_color {
            next.lo_color = v;
        }
        if let Some(v) = o.mid_color {
            next.mid_color = v;
        }
        if let Some(v) = o.hi_color {
            next.hi_color = v;
        }
        if let Some(v) = o.num_gradient_steps {
            next.num_gradient_steps = v;
        }
        if let Some(v) = o.categorical_palette {
            next.categorical_palette = v;
        }
        if let Some(v) = o.category_colors {
            next.category_colors = v;
        }
        if let Some(v) = o.default_opacity {
            next.default_opacity = v;
        }
        if let Some(v) = o.key_fn {
            next.key_fn = v;
        }
        if let Some(v) = o.transitions_enabled {
            next.transitions_enabled = v;
        }
        if let Some(v) = o.domain_padding {
            next.domain_padding = v;
        }
        next
    }

    /// Checks every option, reporting the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.x_key.is_empty() {
            return Err(Error::configuration("`x_key` is required"));
        }
        if self.y_key.is_empty() {
            return Err(Error::configuration("`y_key` is required"));
        }
        if self.radius_key.as_deref() == Some("") {
            return Err(Error::configuration("`radius_key` must not be empty"));
        }
        for radius in [self.min_radius, self.max_radius, self.default_radius] {
            if !radius.is_finite() || radius < 0.0 {
                return Err(Error::configuration(
                    "radii must be finite and non-negative",
                ));
            }
        }
        if self.min_radius > self.max_radius {
            return Err(Error::configuration(
                "`min_radius` must not exceed `max_radius`",
            ));
        }
        if self.num_gradient_steps == 0 {
            return Err(Error::configuration(
                "`num_gradient_steps` must be at least 1",
            ));
        }
        if self.categorical_palette.is_empty() {
            return Err(Error::configuration(
                "`categorical_palette` must not be empty",
            ));
        }
        if !(0.0..=1.0).contains(&self.default_opacity) {
            return Err(Error::configuration(
                "`default_opacity` must lie in [0, 1]",
            ));
        }
        if let DomainPadding::Fixed(b) = self.domain_padding
            && (!b.is_finite() || b < 0.0)
        {
            return Err(Error::configuration(
                "fixed domain padding must be finite and non-negative",
            ));
        }
        if !self.font_size.is_finite() || self.font_size < 0.0 {
            return Err(Error::configuration("`font_size` must be non-negative"));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(Error::configuration("`padding` must be non-negative"));
        }
        if let KeyFn::Field(field) = &self.key_fn
            && field.is_empty()
        {
            return Err(Error::configuration("key field must not be empty"));
        }
        Ok(())
    }
}

/// Partial configuration applied by [`crate::ScatterPlot::update_data`].
///
/// `None` keeps the current value. Optional fields use a nested `Option` so they
/// can be cleared (`Some(None)`).
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Replacement x field.
    pub x_key: Option<String>,
    /// Replacement y field.
    pub y_key: Option<String>,
    /// Replacement radius field.
    pub radius_key: Option<Option<String>>,
    /// Replacement categorical fill field.
    pub fill_key_categorical: Option<Option<String>>,
    /// Replacement continuous fill field.
    pub fill_key_continuous: Option<Option<String>>,
    /// Replacement fill mode.
    pub categorical: Option<bool>,
    /// Replacement magnitude-fill flag.
    pub fill_by_magnitude: Option<bool>,
    /// Replacement minimum radius.
    pub min_radius: Option<f64>,
    /// Replacement maximum radius.
    pub max_radius: Option<f64>,
    /// Replacement default radius.
    pub default_radius: Option<f64>,
    /// Replacement default fill.
    pub default_fill: Option<Color>,
    /// Replacement low gradient color.
    pub lo_color: Option<Color>,
    /// Replacement mid gradient color.
    pub mid_color: Option<Color>,
    /// Replacement high gradient color.
    pub hi_color: Option<Color>,
    /// Replacement gradient step count.
    pub num_gradient_steps: Option<usize>,
    /// Replacement categorical palette.
    pub categorical_palette: Option<Vec<Color>>,
    /// Replacement per-category colors.
    pub category_colors: Option<HashMap<Key, Color>>,
    /// Replacement resting opacity.
    pub default_opacity: Option<f64>,
    /// Replacement key function.
    pub key_fn: Option<KeyFn>,
    /// Replacement transitions flag.
    pub transitions_enabled: Option<bool>,
    /// Replacement domain buffer strategy.
    pub domain_padding: Option<DomainPadding>,
}

impl ConfigOverrides {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the x and y fields.
    pub fn with_position_keys(mut self, x_key: impl Into<String>, y_key: impl Into<String>) -> Self {
        self.x_key = Some(x_key.into());
        self.y_key = Some(y_key.into());
        self
    }

    /// Replaces (or clears) the radius field.
    pub fn with_radius_key(mut self, field: Option<String>) -> Self {
        self.radius_key = Some(field);
        self
    }

    /// Switches fill mode.
    pub fn with_categorical(mut self, categorical: bool) -> Self {
        self.categorical = Some(categorical);
        self
    }

    /// Replaces the key function.
    pub fn with_key_fn(mut self, key_fn: KeyFn) -> Self {
        self.key_fn = Some(key_fn);
        self
    }

    /// Replaces the per-category colors.
    pub fn with_category_colors(mut self, colors: HashMap<Key, Color>) -> Self {
        self.category_colors = Some(colors);
        self
    }

    /// Replaces the resting opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.default_opacity = Some(opacity);
        self
    }

    /// Replaces the transitions flag.
    pub fn with_transitions(mut self, enabled: bool) -> Self {
        self.transitions_enabled = Some(enabled);
        self
    }
}
