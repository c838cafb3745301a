// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition durations.
//!
//! Data-driven updates stagger marks by their distance from the centre of the
//! data: marks near the centroid move first and the outermost mark takes the
//! full animation budget. Everything else uses one uniform duration.

use core::time::Duration;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::Point;

use crate::config::ScatterConfig;
use crate::scale::extent;

/// Both axes are divided by this before squaring so large data values cannot
/// overflow the distance computation.
pub const DISTANCE_NORMALIZER: f64 = 1e6;

/// Per-update geometry shared by every mark's duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSnapshot {
    /// Midpoint of the data extent, in data space.
    pub centroid: Point,
    /// Largest normalised distance from the centroid over the data set.
    pub max_distance: f64,
    /// Divisor applied to both axes before measuring.
    pub normalizer: f64,
}

impl TransitionSnapshot {
    /// Computes the snapshot for a set of data-space points.
    ///
    /// No points gives a zero snapshot, where every duration is the base delay.
    pub fn from_points(points: &[Point]) -> Self {
        let centroid = match (
            extent(points.iter().map(|p| p.x)),
            extent(points.iter().map(|p| p.y)),
        ) {
            (Some((x0, x1)), Some((y0, y1))) => Point::new((x0 + x1) / 2.0, (y0 + y1) / 2.0),
            _ => Point::ZERO,
        };
        let mut snapshot = Self {
            centroid,
            max_distance: 0.0,
            normalizer: DISTANCE_NORMALIZER,
        };
        snapshot.max_distance = points
            .iter()
            .map(|p| snapshot.distance(*p))
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max);
        snapshot
    }

    /// Normalised Euclidean distance from the centroid.
    pub fn distance(&self, point: Point) -> f64 {
        let dx = (point.x - self.centroid.x) / self.normalizer;
        let dy = (point.y - self.centroid.y) / self.normalizer;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance as a fraction of the maximum, clamped to `[0, 1]`.
    pub fn ratio(&self, point: Point) -> f64 {
        if self.max_distance <= 0.0 {
            return 0.0;
        }
        let r = self.distance(point) / self.max_distance;
        if r.is_nan() { 1.0 } else { r.clamp(0.0, 1.0) }
    }
}

/// Assigns durations from configuration timing and a snapshot.
#[derive(Clone, Copy, Debug)]
pub struct TransitionScheduler {
    base_delay: Duration,
    animation_budget: Duration,
    uniform: Duration,
    enabled: bool,
    snapshot: TransitionSnapshot,
}

impl TransitionScheduler {
    /// Creates a scheduler for one update.
    pub fn new(config: &ScatterConfig, snapshot: TransitionSnapshot) -> Self {
        Self {
            base_delay: config.base_delay,
            animation_budget: config.animation_budget,
            uniform: config.uniform_duration,
            enabled: config.transitions_enabled,
            snapshot,
        }
    }

    /// Returns the snapshot in use.
    pub fn snapshot(&self) -> &TransitionSnapshot {
        &self.snapshot
    }

    /// Distance-proportional duration for a mark whose datum sits at `point`.
    pub fn duration_for(&self, point: Point) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }
        let ratio = self.snapshot.ratio(point);
        // `mul_f64` panics when rounding pushes a huge budget past `Duration::MAX`.
        let share = Duration::try_from_secs_f64(self.animation_budget.as_secs_f64() * ratio)
            .map_or(self.animation_budget, |d| d.min(self.animation_budget));
        self.base_delay.saturating_add(share)
    }

    /// Duration for non-data-driven transitions.
    pub fn uniform(&self) -> Duration {
        if self.enabled {
            self.uniform
        } else {
            Duration::ZERO
        }
    }
}
