// Copyright 2025 the Scatter Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::time::Duration;

use approx::assert_abs_diff_eq;
use kurbo::{Point, Rect, Size};
use peniko::color::palette::css;

use crate::{
    Axis, Canvas, ConfigOverrides, Datum, Dimension, DomainPadding, Error, FillDomain, Key,
    MarkAttrs, Phase, ScaleLinear, ScatterConfig, ScatterPlot,
};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Create(Key, MarkAttrs),
    Update(Key, MarkAttrs, Duration),
    Remove(Key, Duration),
    Bind(Key),
}

#[derive(Debug)]
struct RecordingCanvas {
    size: Size,
    calls: Vec<Call>,
}

impl RecordingCanvas {
    fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            calls: Vec::new(),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn create_mark(&mut self, key: &Key, attrs: &MarkAttrs) {
        self.calls.push(Call::Create(key.clone(), *attrs));
    }

    fn update_mark(&mut self, key: &Key, attrs: &MarkAttrs, duration: Duration) {
        self.calls.push(Call::Update(key.clone(), *attrs, duration));
    }

    fn remove_mark(&mut self, key: &Key, duration: Duration) {
        self.calls.push(Call::Remove(key.clone(), duration));
    }

    fn bind_hover(&mut self, key: &Key) {
        self.calls.push(Call::Bind(key.clone()));
    }
}

#[derive(Debug, Default)]
struct RecordingAxis {
    anchor: Option<Point>,
    redraws: Vec<(ScaleLinear, Option<Duration>)>,
}

impl Axis for RecordingAxis {
    fn position(&mut self, anchor: Point) {
        self.anchor = Some(anchor);
    }

    fn redraw(&mut self, scale: &ScaleLinear, duration: Option<Duration>) {
        self.redraws.push((*scale, duration));
    }
}

type Plot = ScatterPlot<RecordingCanvas, RecordingAxis>;

fn plot(width: f64, height: f64) -> Plot {
    ScatterPlot::new(
        RecordingCanvas::new(width, height),
        RecordingAxis::default(),
        RecordingAxis::default(),
    )
}

fn pt(key: &str, x: f64, y: f64) -> Datum {
    Datum::new().with("key", key).with("x", x).with("y", y)
}

fn config() -> ScatterConfig {
    ScatterConfig::default().with_layout(10.0, 20.0)
}

fn take_calls(plot: &mut Plot) -> Vec<Call> {
    core::mem::take(&mut plot.canvas_mut().calls)
}

fn attrs_of(plot: &Plot, key: &str) -> MarkAttrs {
    plot.marks().get(&Key::from(key)).unwrap().attrs
}

const SECOND: Duration = Duration::from_millis(1000);

#[test]
fn deferred_first_render_happens_on_resize() {
    let mut plot = plot(0.0, 0.0);
    let data = vec![pt("a", 0.0, 0.0), pt("b", 10.0, 10.0)];

    let pass = plot.initialize(&data, config()).unwrap();
    assert!(pass.deferred);
    assert!(plot.is_deferred());
    assert_eq!(pass.partition.enter.len(), 2);
    assert!(plot.canvas().calls.is_empty());
    assert!(plot.marks().is_empty());
    assert_eq!(plot.data().len(), 2);

    let pass = plot.resize(220.0, 220.0).unwrap();
    assert!(!pass.deferred);
    assert!(!plot.is_deferred());

    let layout = plot.layout().unwrap();
    assert_eq!(layout.chart, Rect::new(10.0, 20.0, 200.0, 200.0));
    assert_eq!(layout.chart.size(), Size::new(190.0, 180.0));

    // A mark of the default radius touches the chart edges.
    let a = attrs_of(&plot, "a").position;
    assert_abs_diff_eq!(a.x, 15.0, epsilon = 1e-9);
    assert_abs_diff_eq!(a.y, 195.0, epsilon = 1e-9);
    let b = attrs_of(&plot, "b").position;
    assert_abs_diff_eq!(b.x, 195.0, epsilon = 1e-9);
    assert_abs_diff_eq!(b.y, 25.0, epsilon = 1e-9);

    // Fade in: created transparent, then brought to resting opacity.
    let calls = take_calls(&mut plot);
    assert_eq!(calls.len(), 6);
    let Call::Create(key, initial) = &calls[0] else {
        panic!("expected create, got {:?}", calls[0]);
    };
    assert_eq!(key, &Key::from("a"));
    assert_eq!(initial.opacity, 0.0);
    assert_eq!(initial.position, a);
    assert_eq!(calls[1], Call::Bind(Key::from("a")));
    assert_eq!(
        calls[2],
        Call::Update(Key::from("a"), attrs_of(&plot, "a"), SECOND)
    );
    assert_eq!(attrs_of(&plot, "a").opacity, 0.5);

    let (x_axis, y_axis) = plot.axes();
    assert_eq!(x_axis.anchor, Some(Point::new(10.0, 200.0)));
    assert_eq!(y_axis.anchor, Some(Point::new(10.0, 20.0)));
    assert_eq!(x_axis.redraws.len(), 1);
    assert_eq!(x_axis.redraws[0].1, None);
    assert_eq!(y_axis.redraws[0].0.range(), (180.0, 0.0));
}

#[test]
fn unusable_resize_keeps_previous_layout() {
    let mut plot = plot(220.0, 220.0);
    plot.initialize(&[pt("a", 1.0, 1.0)], config()).unwrap();
    take_calls(&mut plot);
    let before = *plot.layout().unwrap();

    let err = plot.resize(20.0, 220.0).unwrap_err();
    assert!(matches!(err, Error::LayoutNotReady { .. }));
    assert_eq!(plot.layout(), Some(&before));
    assert!(plot.canvas().calls.is_empty());
}

#[test]
fn resize_retargets_with_uniform_duration() {
    let mut plot = plot(220.0, 220.0);
    plot.initialize(
        &[pt("a", 0.0, 0.0), pt("b", 10.0, 10.0)],
        config().with_uniform_duration(Duration::from_millis(250)),
    )
    .unwrap();
    take_calls(&mut plot);

    let pass = plot.resize(420.0, 220.0).unwrap();
    assert!(pass.partition.is_stable());
    assert!(
        pass.transitions
            .iter()
            .all(|t| t.duration == Duration::from_millis(250))
    );
    assert_abs_diff_eq!(attrs_of(&plot, "b").position.x, 395.0, epsilon = 1e-9);
    let (x_axis, _) = plot.axes();
    assert_eq!(x_axis.redraws.len(), 2);
    assert_eq!(x_axis.redraws[1].1, Some(Duration::from_millis(250)));
}

#[test]
fn replacing_one_key_enters_and_exits() {
    let mut plot = plot(220.0, 220.0);
    plot.initialize(&[pt("a", 0.0, 0.0), pt("b", 10.0, 10.0)], config())
        .unwrap();
    let a_before = attrs_of(&plot, "a");
    take_calls(&mut plot);

    let pass = plot
        .update_data(&[pt("a", 0.0, 0.0), pt("c", 10.0, 10.0)], None)
        .unwrap();

    assert_eq!(pass.partition.exit, vec![Key::from("b")]);
    assert_eq!(pass.partition.enter[0].key, Key::from("c"));
    assert_eq!(pass.partition.update[0].key, Key::from("a"));
    assert_eq!(attrs_of(&plot, "a"), a_before);
    assert!(!plot.marks().contains(&Key::from("b")));

    let c = attrs_of(&plot, "c");
    assert_eq!(
        take_calls(&mut plot),
        vec![
            Call::Remove(Key::from("b"), SECOND),
            Call::Update(Key::from("a"), a_before, SECOND),
            Call::Create(
                Key::from("c"),
                MarkAttrs {
                    radius: 0.0,
                    ..c
                }
            ),
            Call::Bind(Key::from("c")),
            Call::Update(Key::from("c"), c, SECOND),
        ]
    );
    assert_eq!(pass.transition(&Key::from("b")).unwrap().phase, Phase::Exit);
}

#[test]
fn identical_update_is_idempotent() {
    let mut plot = plot(220.0, 220.0);
    let data = vec![pt("a", 0.0, 3.0), pt("b", 4.0, 10.0), pt("c", 7.0, 1.0)];
    plot.initialize(&data, config()).unwrap();
    let before: Vec<_> = plot.marks().iter().cloned().collect();
    let x_redraws = plot.axes().0.redraws.len();

    let pass = plot.update_data(&data, None).unwrap();
    assert!(pass.partition.is_stable());
    assert_eq!(pass.partition.update.len(), 3);
    let after: Vec<_> = plot.marks().iter().cloned().collect();
    assert_eq!(before, after);
    for t in &pass.transitions {
        assert_eq!(t.target, Some(attrs_of(&plot, key_str(&t.key))));
    }
    // Unchanged scales are not redrawn.
    assert_eq!(plot.axes().0.redraws.len(), x_redraws);
}

fn key_str(key: &Key) -> &str {
    match key {
        Key::Text(s) => s,
        Key::Number(_) => panic!("text keys only"),
    }
}

#[test]
fn failing_update_changes_nothing() {
    let mut plot = plot(220.0, 220.0);
    let data = vec![pt("a", 0.0, 0.0), pt("b", 10.0, 10.0)];
    plot.initialize(&data, config()).unwrap();
    take_calls(&mut plot);
    let marks: Vec<_> = plot.marks().iter().cloned().collect();
    let x_domain = plot.scales().linear_domain(Dimension::X);

    let duplicate = vec![pt("a", 1.0, 1.0), pt("z", 2.0, 2.0), pt("a", 3.0, 3.0)];
    assert_eq!(
        plot.update_data(&duplicate, None).unwrap_err(),
        Error::DuplicateKey {
            key: Key::from("a")
        }
    );

    let missing = vec![pt("a", 1.0, 1.0), Datum::new().with("key", "q").with("x", 5)];
    assert!(matches!(
        plot.update_data(&missing, None),
        Err(Error::MissingField { index: 1, ref field }) if field == "y"
    ));

    let invalid = ConfigOverrides::new().with_opacity(2.0);
    assert!(matches!(
        plot.update_data(&[pt("n", 50.0, 50.0)], Some(invalid)),
        Err(Error::Configuration(_))
    ));

    assert!(plot.canvas().calls.is_empty());
    assert_eq!(plot.marks().iter().cloned().collect::<Vec<_>>(), marks);
    assert_eq!(plot.data(), &data[..]);
    assert_eq!(plot.scales().linear_domain(Dimension::X), x_domain);
    assert_eq!(plot.config().default_opacity, 0.5);
}

#[test]
fn radius_too_large_for_the_chart_is_rejected_without_deferring() {
    let mut plot = plot(220.0, 220.0);
    let data = vec![pt("a", 0.0, 0.0), pt("b", 10.0, 10.0)];
    plot.initialize(&data, config()).unwrap();
    take_calls(&mut plot);
    let marks: Vec<_> = plot.marks().iter().cloned().collect();

    // A 190x180 chart cannot hold a mark of radius 100 at the data extremes.
    let oversized = ConfigOverrides {
        default_radius: Some(100.0),
        ..ConfigOverrides::new()
    };
    let err = plot
        .update_data(&[pt("a", 0.0, 0.0), pt("c", 10.0, 10.0)], Some(oversized))
        .unwrap_err();
    assert!(matches!(err, Error::LayoutNotReady { .. }));
    assert!(!plot.is_deferred());
    assert!(plot.canvas().calls.is_empty());
    assert_eq!(plot.marks().iter().cloned().collect::<Vec<_>>(), marks);
    assert_eq!(plot.data(), &data[..]);
    assert_eq!(plot.config().default_radius, 5.0);

    // The plot keeps working with its previous configuration.
    let pass = plot
        .update_data(&[pt("a", 0.0, 0.0), pt("c", 10.0, 10.0)], None)
        .unwrap();
    assert!(!pass.deferred);
    assert_eq!(pass.partition.exit, vec![Key::from("b")]);
    let pass = plot.resize(220.0, 220.0).unwrap();
    assert!(!pass.deferred);
    assert!(plot.marks().contains(&Key::from("c")));
}

#[test]
fn oversized_timing_saturates_instead_of_overflowing() {
    let mut plot = plot(220.0, 220.0);
    plot.initialize(
        &[pt("a", 0.0, 0.0), pt("b", 10.0, 10.0)],
        config().with_timing(Duration::MAX, SECOND),
    )
    .unwrap();

    let pass = plot
        .update_data(&[pt("a", 2.0, 3.0), pt("c", 9.0, 1.0)], None)
        .unwrap();
    assert_eq!(pass.transitions.len(), 3);
    assert!(pass.transitions.iter().all(|t| t.duration == Duration::MAX));
}

#[test]
fn pinned_category_colors_override_the_palette() {
    let mut plot = plot(220.0, 220.0);
    let data = vec![
        pt("p", 0.0, 0.0).with("kind", "red"),
        pt("q", 1.0, 1.0).with("kind", "blue"),
        pt("r", 2.0, 2.0).with("kind", "green"),
    ];
    let config = config()
        .with_categorical_fill("kind")
        .with_category_color("blue", css::GOLD);
    let palette = config.categorical_palette.clone();
    plot.initialize(&data, config).unwrap();

    assert_eq!(attrs_of(&plot, "p").fill, palette[0]);
    assert_eq!(attrs_of(&plot, "q").fill, css::GOLD);
    assert_eq!(attrs_of(&plot, "r").fill, palette[2]);

    let cleared = ConfigOverrides::new().with_category_colors(hashbrown::HashMap::new());
    plot.update_data(&data, Some(cleared)).unwrap();
    assert_eq!(attrs_of(&plot, "q").fill, palette[1]);
}

#[test]
fn categorical_fill_follows_first_seen_order() {
    let mut plot = plot(220.0, 220.0);
    let data = vec![
        pt("p", 0.0, 0.0).with("kind", "red"),
        pt("q", 1.0, 1.0).with("kind", "blue"),
        pt("r", 2.0, 2.0).with("kind", "red"),
    ];
    let config = config().with_categorical_fill("kind");
    let palette = config.categorical_palette.clone();
    plot.initialize(&data, config).unwrap();

    assert_eq!(
        plot.scales().fill_domain(),
        Some(&FillDomain::Categories(vec![
            Key::from("red"),
            Key::from("blue")
        ]))
    );
    assert_eq!(attrs_of(&plot, "p").fill, palette[0]);
    assert_eq!(attrs_of(&plot, "q").fill, palette[1]);
    assert_eq!(attrs_of(&plot, "r").fill, palette[0]);
}

#[test]
fn disabled_transitions_are_instant() {
    let mut plot = plot(220.0, 220.0);
    let config = config().with_transitions(false);
    plot.initialize(&[pt("a", 0.0, 0.0), pt("b", 5.0, 5.0)], config)
        .unwrap();
    let pass = plot
        .update_data(&[pt("a", 1.0, 0.0), pt("c", 8.0, 2.0)], None)
        .unwrap();
    assert_eq!(pass.transitions.len(), 3);
    assert!(pass.transitions.iter().all(|t| t.duration.is_zero()));
    assert!(plot.axes().0.redraws.iter().all(|(_, d)| d.is_none()));
}

#[test]
fn data_driven_durations_grow_from_the_centroid() {
    let mut plot = plot(220.0, 220.0);
    let config = config().with_timing(Duration::from_millis(100), SECOND);
    let data = vec![pt("a", 0.0, 0.0), pt("m", 5.0, 5.0), pt("b", 10.0, 10.0)];
    plot.initialize(&data, config).unwrap();

    let pass = plot.update_data(&data, None).unwrap();
    let duration = |k: &str| pass.transition(&Key::from(k)).unwrap().duration;
    assert_eq!(duration("m"), Duration::from_millis(100));
    assert_eq!(duration("a"), Duration::from_millis(1100));
    assert_eq!(duration("b"), Duration::from_millis(1100));
}

#[test]
fn emptying_the_data_exits_everything_uniformly() {
    let mut plot = plot(220.0, 220.0);
    plot.initialize(
        &[pt("a", 0.0, 0.0), pt("b", 10.0, 10.0)],
        config().with_uniform_duration(Duration::from_millis(300)),
    )
    .unwrap();
    let x_domain = plot.scales().linear_domain(Dimension::X);
    take_calls(&mut plot);

    let pass = plot.update_data(&[], None).unwrap();
    assert_eq!(pass.partition.exit.len(), 2);
    assert!(plot.marks().is_empty());
    assert_eq!(
        take_calls(&mut plot),
        vec![
            Call::Remove(Key::from("a"), Duration::from_millis(300)),
            Call::Remove(Key::from("b"), Duration::from_millis(300)),
        ]
    );
    assert_eq!(plot.scales().linear_domain(Dimension::X), x_domain);
}

#[test]
fn update_field_rebinds_position() {
    let mut plot = plot(220.0, 220.0);
    let data = vec![
        pt("a", 0.0, 0.0).with("alt", 10.0),
        pt("b", 10.0, 10.0).with("alt", 0.0),
    ];
    plot.initialize(&data, config()).unwrap();
    let a_before = attrs_of(&plot, "a").position;

    let pass = plot.update_field(Dimension::X, "alt").unwrap();
    assert!(pass.partition.is_stable());
    assert_eq!(plot.config().x_key, "alt");
    let a_after = attrs_of(&plot, "a").position;
    assert_abs_diff_eq!(a_after.x, 195.0, epsilon = 1e-9);
    assert_eq!(a_after.y, a_before.y);

    assert!(matches!(
        plot.update_field(Dimension::Y, "nope"),
        Err(Error::MissingField { index: 0, .. })
    ));
    assert_eq!(plot.config().y_key, "y");
}

#[test]
fn radius_field_maps_onto_radius_range() {
    let mut plot = plot(220.0, 220.0);
    let data = vec![
        pt("a", 0.0, 0.0).with("size", 1.0),
        pt("b", 10.0, 10.0).with("size", 3.0),
        pt("c", 5.0, 5.0),
    ];
    plot.initialize(
        &data,
        config().with_radius_key("size").with_radius_range(2.0, 8.0),
    )
    .unwrap();
    assert_eq!(attrs_of(&plot, "a").radius, 2.0);
    assert_eq!(attrs_of(&plot, "b").radius, 8.0);
    assert_eq!(attrs_of(&plot, "c").radius, 5.0);
}

#[test]
fn color_updates_remap_continuous_fill_only() {
    let mut plot = plot(220.0, 220.0);
    let data = vec![
        pt("a", 0.0, 0.0).with("heat", 0.0),
        pt("b", 10.0, 10.0).with("heat", 1.0),
    ];
    plot.initialize(&data, config().with_continuous_fill("heat"))
        .unwrap();
    take_calls(&mut plot);

    let pass = plot
        .update_colors(css::BLACK, css::GRAY, css::WHITE)
        .unwrap();
    assert!(pass.transitions.iter().all(|t| t.duration == SECOND));
    assert_eq!(attrs_of(&plot, "a").fill.to_rgba8(), css::BLACK.to_rgba8());
    assert_eq!(attrs_of(&plot, "b").fill.to_rgba8(), css::WHITE.to_rgba8());

    let mut categorical = self::plot(220.0, 220.0);
    categorical
        .initialize(&data, config().with_categorical_fill("key"))
        .unwrap();
    take_calls(&mut categorical);
    let pass = categorical
        .update_colors(css::BLACK, css::GRAY, css::WHITE)
        .unwrap();
    assert!(pass.transitions.is_empty());
    assert!(categorical.canvas().calls.is_empty());
    assert_eq!(categorical.config().lo_color, css::BLACK);
}

#[test]
fn fixed_domain_padding_matches_unit_buffer() {
    let mut plot = plot(220.0, 220.0);
    plot.initialize(
        &[pt("a", 0.0, 0.0), pt("b", 10.0, 10.0)],
        config().with_domain_padding(DomainPadding::Fixed(1.0)),
    )
    .unwrap();
    assert_eq!(
        plot.scales().linear_domain(Dimension::X),
        Some((-1.0, 11.0))
    );
}

#[test]
fn hover_events_reach_the_handler() {
    let mut plot = plot(220.0, 220.0);
    plot.initialize(&[pt("a", 0.0, 0.0).with("label", "first")], config())
        .unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    plot.set_hover_handler(move |key: &Key, datum: &Datum, entering: bool| {
        let label = datum.get("label").and_then(|v| v.as_str()).unwrap_or("");
        sink.borrow_mut()
            .push((key.clone(), String::from(label), entering));
    });

    assert!(plot.hover_enter(&Key::from("a")));
    assert!(plot.hover_leave(&Key::from("a")));
    assert!(!plot.hover_enter(&Key::from("missing")));
    assert_eq!(
        *seen.borrow(),
        vec![
            (Key::from("a"), String::from("first"), true),
            (Key::from("a"), String::from("first"), false),
        ]
    );
}

#[test]
fn operations_require_initialization() {
    let mut plot = plot(220.0, 220.0);
    assert!(matches!(
        plot.update_data(&[], None),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        plot.resize(100.0, 100.0),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn reinitialize_replaces_marks() {
    let mut plot = plot(220.0, 220.0);
    plot.initialize(&[pt("a", 0.0, 0.0), pt("b", 1.0, 1.0)], config())
        .unwrap();
    take_calls(&mut plot);

    let pass = plot
        .initialize(&[pt("b", 0.0, 0.0)], config().with_opacity(0.8))
        .unwrap();
    assert_eq!(pass.partition.enter.len(), 1);
    let calls = take_calls(&mut plot);
    assert_eq!(calls[0], Call::Remove(Key::from("a"), Duration::ZERO));
    assert_eq!(calls[1], Call::Remove(Key::from("b"), Duration::ZERO));
    assert_eq!(attrs_of(&plot, "b").opacity, 0.8);
    assert_eq!(plot.marks().len(), 1);
}

#[test]
fn update_with_new_key_fn_reidentifies_marks() {
    let mut plot = plot(220.0, 220.0);
    let data = vec![
        pt("a", 0.0, 0.0).with("id", 1),
        pt("b", 10.0, 10.0).with("id", 2),
    ];
    plot.initialize(&data, config()).unwrap();

    let pass = plot
        .update_data(
            &data,
            Some(ConfigOverrides::new().with_key_fn(crate::KeyFn::field("id"))),
        )
        .unwrap();
    assert_eq!(pass.partition.enter.len(), 2);
    assert_eq!(pass.partition.exit.len(), 2);
    assert!(plot.marks().contains(&Key::from(1)));
}
