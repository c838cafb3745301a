// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scatter plot demo for `scatter_core`.
//!
//! Drives one plot through a sequence of operations and writes an SVG snapshot
//! after each. Set `RUST_LOG=debug` to see reconciliation summaries.

mod svg;

use peniko::color::palette::css;
use scatter_core::{
    ConfigOverrides, Datum, Dimension, Key, RenderPass, ScatterConfig, ScatterPlot,
};
use svg::{AxisOrient, SvgAxis, SvgCanvas};

type Plot = ScatterPlot<SvgCanvas, SvgAxis>;

/// Deterministic scattered points: `(key, x, y, size, group)`.
fn sample(count: u32, phase: f64) -> Vec<Datum> {
    (0..count)
        .map(|i| {
            let t = f64::from(i) * 0.7 + phase;
            let x = 10.0 * t.cos() * (1.0 + f64::from(i) / 10.0);
            let y = 8.0 * (1.3 * t).sin() * (1.0 + f64::from(i) / 12.0);
            let group = ["north", "south", "east"][(i % 3) as usize];
            Datum::new()
                .with("key", format!("p{i}"))
                .with("x", x)
                .with("y", y)
                .with("size", f64::from(i % 5) + 1.0)
                .with("group", group)
        })
        .collect()
}

fn snapshot(plot: &Plot, name: &str, pass: &RenderPass) {
    let (x_axis, y_axis) = plot.axes();
    let svg = svg::render(plot.canvas(), x_axis, y_axis);
    let path = format!("scatter_demo_{name}.svg");
    std::fs::write(&path, svg).expect("write snapshot");
    println!(
        "wrote {path}: {} enter, {} update, {} exit{}",
        pass.partition.enter.len(),
        pass.partition.update.len(),
        pass.partition.exit.len(),
        if pass.deferred { " (deferred)" } else { "" }
    );
}

fn main() {
    env_logger::init();

    // Start with no usable area; the first resize renders.
    let mut plot = ScatterPlot::new(
        SvgCanvas::new(0.0, 0.0),
        SvgAxis::new(AxisOrient::Bottom, 10.0),
        SvgAxis::new(AxisOrient::Left, 10.0),
    );
    plot.set_hover_handler(|key: &Key, datum: &Datum, entering: bool| {
        if entering {
            log::info!("hover {key}: {datum:?}");
        }
    });

    let config = ScatterConfig::default()
        .with_magnitude_fill()
        .with_radius_key("size")
        .with_radius_range(3.0, 9.0);
    let pass = plot
        .initialize(&sample(24, 0.0), config)
        .expect("valid configuration");
    snapshot(&plot, "0_deferred", &pass);

    plot.canvas_mut().set_size(480.0, 320.0);
    let pass = plot.resize(480.0, 320.0).expect("usable size");
    snapshot(&plot, "1_first_render", &pass);

    let mut next = sample(30, 0.4);
    next.drain(0..6);
    let pass = plot.update_data(&next, None).expect("valid update");
    snapshot(&plot, "2_update", &pass);

    let pass = plot
        .update_colors(css::DARK_ORANGE, css::WHITE_SMOKE, css::TEAL)
        .expect("valid colors");
    snapshot(&plot, "3_colors", &pass);

    let overrides = ConfigOverrides::new()
        .with_categorical(true)
        .with_category_colors([(Key::from("north"), css::CRIMSON)].into_iter().collect());
    let categorical = ConfigOverrides {
        fill_key_categorical: Some(Some("group".into())),
        ..overrides
    };
    let pass = plot
        .update_data(&next, Some(categorical))
        .expect("valid update");
    snapshot(&plot, "4_categorical", &pass);

    let pass = plot
        .update_field(Dimension::Radius, "x")
        .expect("numeric field");
    snapshot(&plot, "5_radius_by_x", &pass);

    plot.canvas_mut().set_size(640.0, 360.0);
    let pass = plot.resize(640.0, 360.0).expect("usable size");
    snapshot(&plot, "6_resized", &pass);

    plot.hover_enter(&Key::from("p10"));
    plot.hover_leave(&Key::from("p10"));
}
