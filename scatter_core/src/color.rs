// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color ramps and palettes for the fill scales.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use peniko::Color;

/// The ten-color categorical palette used by default.
pub fn category10() -> Vec<Color> {
    [
        (0x1f, 0x77, 0xb4),
        (0xff, 0x7f, 0x0e),
        (0x2c, 0xa0, 0x2c),
        (0xd6, 0x27, 0x28),
        (0x94, 0x67, 0xbd),
        (0x8c, 0x56, 0x4b),
        (0xe3, 0x77, 0xc2),
        (0x7f, 0x7f, 0x7f),
        (0xbc, 0xbd, 0x22),
        (0x17, 0xbe, 0xcf),
    ]
    .into_iter()
    .map(|(r, g, b)| Color::from_rgba8(r, g, b, 0xff))
    .collect()
}

/// Linearly interpolates two colors in 8-bit sRGB space.
///
/// `t` is clamped to `[0, 1]`.
pub fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let a = a.to_rgba8();
    let b = b.to_rgba8();
    let mix = |x: u8, y: u8| -> u8 {
        let v = (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round();
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "value is a blend of two u8 channels"
        )]
        {
            v.clamp(0.0, 255.0) as u8
        }
    };
    Color::from_rgba8(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

/// Builds an `steps`-color ramp running `lo → mid → hi`.
///
/// The first half of the ramp blends `lo` into `mid`, the second half `mid` into
/// `hi`. The first and last entries are exactly `lo` and `hi` when `steps >= 2`;
/// a single step yields `lo`.
pub fn interpolate_colors(lo: Color, mid: Color, hi: Color, steps: usize) -> Vec<Color> {
    if steps == 0 {
        return Vec::new();
    }
    if steps == 1 {
        return alloc::vec![lo];
    }
    let last = (steps - 1) as f64;
    (0..steps)
        .map(|i| {
            let t = i as f64 / last;
            if t <= 0.5 {
                lerp_color(lo, mid, t * 2.0)
            } else {
                lerp_color(mid, hi, (t - 0.5) * 2.0)
            }
        })
        .collect()
}
