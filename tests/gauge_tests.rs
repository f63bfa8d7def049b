// Behaviour of the gauge as seen through the recorded draw commands.

use std::f64::consts::{PI, TAU};

use gauge::render::{LabelPlacement, HAND_LENGTH_FACTOR, RIM_RADIUS_FACTOR};
use gauge::{
    labels, Color, DrawCommand, Gauge, GaugeConfig, Label, Scene, StrokeStyle, Surface,
    Transform,
};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn gauge_with(values: &[&str], config: GaugeConfig) -> Gauge<Scene> {
    let config = GaugeConfig {
        values: labels(values.iter().copied()),
        ..config
    };
    Gauge::new(Scene::new(240, 200), config).unwrap()
}

/// Commands issued by the most recent full redraw (from its clear onwards).
fn last_redraw(scene: &Scene) -> &[DrawCommand] {
    let commands = scene.commands();
    let start = commands
        .iter()
        .rposition(|c| matches!(c, DrawCommand::ClearRect { .. }))
        .expect("no redraw recorded");
    &commands[start..]
}

/// Transform in effect when the hand wedge (the last fill) was painted.
fn hand_transform(scene: &Scene) -> Transform {
    let mut transform = None;
    let mut at_fill = None;
    for command in scene.commands() {
        match command {
            DrawCommand::SetTransform(t) => transform = Some(*t),
            DrawCommand::Fill => at_fill = transform,
            _ => {}
        }
    }
    at_fill.expect("hand was not filled")
}

fn wrapped(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

// === Angle mapping ===

#[test]
fn angle_of_maps_indices_linearly() {
    let gauge = gauge_with(&["0", "1", "2", "3", "4"], GaugeConfig::default());
    let delta = gauge.config().delta_angle;
    assert_eq!(gauge.angle_of(0), 0.0);
    for n in 0..5 {
        assert!(approx_eq(gauge.angle_of(n), n as f64 / 4.0 * delta));
    }
    assert!(approx_eq(gauge.angle_of(4), delta));
}

// === Hand placement ===

#[test]
fn hand_points_at_selected_index() {
    let mut gauge = gauge_with(&["a", "b", "c", "d"], GaugeConfig::default());
    for (index, value) in ["c", "a", "d", "b"].into_iter().enumerate() {
        gauge.set_value(value);
        let expected_index = ["a", "b", "c", "d"].iter().position(|v| *v == value).unwrap();
        let expected = gauge
            .local_frame()
            .rotate(gauge.angle_of(expected_index as isize));
        assert_eq!(hand_transform(gauge.surface()), expected, "step {index}");
    }
}

#[test]
fn hand_wedge_geometry() {
    let mut gauge = gauge_with(&["a", "b"], GaugeConfig::default());
    gauge.set_value("b");
    let radius = gauge.radius();
    let config = gauge.config().clone();
    let redraw = last_redraw(gauge.surface());
    let wedge_start = redraw
        .iter()
        .rposition(|c| matches!(c, DrawCommand::BeginPath))
        .unwrap();
    assert_eq!(
        &redraw[wedge_start..],
        &[
            DrawCommand::BeginPath,
            DrawCommand::MoveTo {
                x: 0.0,
                y: -config.hand_delta
            },
            DrawCommand::LineTo {
                x: radius * HAND_LENGTH_FACTOR,
                y: 0.0
            },
            DrawCommand::LineTo {
                x: 0.0,
                y: config.hand_delta
            },
            DrawCommand::ClosePath,
            DrawCommand::Fill,
            DrawCommand::SetTransform(gauge.local_frame()),
        ]
    );
}

#[test]
fn hub_is_drawn_before_rotation() {
    let mut gauge = gauge_with(&["a", "b"], GaugeConfig::default());
    gauge.set_value("b");
    let redraw = last_redraw(gauge.surface());
    let hub = redraw
        .iter()
        .rposition(|c| {
            matches!(c, DrawCommand::Arc { radius, end, .. } if *radius == 10.0 && *end == TAU)
        })
        .expect("hub arc");
    let rotated = redraw
        .iter()
        .rposition(|c| matches!(c, DrawCommand::SetTransform(t) if *t != gauge.local_frame()))
        .unwrap();
    assert!(hub < rotated);
}

#[test]
fn set_value_is_idempotent() {
    let mut gauge = gauge_with(&["x", "y", "z"], GaugeConfig::default());
    gauge.set_value("z");
    let first = last_redraw(gauge.surface()).to_vec();
    gauge.set_value("y");
    gauge.set_value("z");
    let second = last_redraw(gauge.surface()).to_vec();
    assert_eq!(first, second);
    assert_eq!(gauge.surface().transform(), gauge.local_frame());
}

#[test]
fn transform_returns_to_local_frame_after_every_call() {
    let config = GaugeConfig::builder()
        .init_angle(1.1)
        .delta_angle(5.0)
        .title_reverse(true)
        .build();
    let mut gauge = gauge_with(&["1", "2", "3", "4", "5", "6", "7"], config);
    let frame = Transform::IDENTITY.translate(120.0, 100.0).rotate(1.1);
    assert_eq!(gauge.local_frame(), frame);
    assert_eq!(gauge.surface().transform(), frame);
    for value in ["7", "3", "missing", "1"] {
        gauge.set_value(value);
        assert_eq!(gauge.surface().transform(), frame);
    }
}

// === Scenarios ===

#[test]
fn full_turn_wraps_last_value_onto_first() {
    let config = GaugeConfig::builder().delta_angle(2.0 * PI).build();
    let mut gauge = gauge_with(&["A", "B", "C"], config);
    gauge.set_value("C");
    assert!(approx_eq(gauge.angle_of(2), 2.0 * PI));
    let at_c = hand_transform(gauge.surface());
    gauge.set_value("A");
    let at_a = hand_transform(gauge.surface());
    let diff = wrapped(at_c.rotation() - at_a.rotation());
    assert!(diff < 1e-9 || TAU - diff < 1e-9, "hands differ by {diff}");
}

#[test]
fn omitted_init_value_selects_first() {
    let gauge = gauge_with(&["Low", "Mid", "High"], GaugeConfig::default());
    assert_eq!(gauge.config().init_value, Some(Label::from("Low")));
    assert_eq!(hand_transform(gauge.surface()), gauge.local_frame().rotate(0.0));
}

#[test]
fn init_value_selects_its_index() {
    let config = GaugeConfig::builder().init_value(Label::from("Mid")).build();
    let gauge = gauge_with(&["Low", "Mid", "High"], config);
    assert_eq!(
        hand_transform(gauge.surface()),
        gauge.local_frame().rotate(gauge.angle_of(1))
    );
}

#[test]
fn unknown_value_points_before_the_arc() {
    let mut gauge = gauge_with(&["Low", "Mid", "High"], GaugeConfig::default());
    gauge.set_value("NotInList");
    let delta = gauge.config().delta_angle;
    assert!(approx_eq(gauge.angle_of(-1), -delta / 2.0));
    assert_eq!(
        hand_transform(gauge.surface()),
        gauge.local_frame().rotate(gauge.angle_of(-1))
    );
    // Still a full repaint
    assert!(matches!(last_redraw(gauge.surface())[0], DrawCommand::ClearRect { .. }));
}

#[test]
fn numeric_and_text_labels_do_not_match() {
    let config = GaugeConfig::builder().values(labels([1, 2, 3])).build();
    let mut gauge = Gauge::new(Scene::new(100, 100), config).unwrap();
    gauge.set_value("2");
    assert_eq!(
        hand_transform(gauge.surface()),
        gauge.local_frame().rotate(gauge.angle_of(-1))
    );
    gauge.set_value(2);
    assert_eq!(
        hand_transform(gauge.surface()),
        gauge.local_frame().rotate(gauge.angle_of(1))
    );
}

#[test]
fn single_value_draws_along_the_frame_start() {
    let mut gauge = gauge_with(&["only"], GaugeConfig::default());
    gauge.set_value("only");
    assert!(gauge.angle_of(0).is_nan());
    // The NaN rotation is ignored, so the hand keeps the local frame.
    assert_eq!(hand_transform(gauge.surface()), gauge.local_frame());
    assert!(tick_starts(&gauge)
        .iter()
        .all(|x| approx_eq(*x, gauge.radius() * LabelPlacement::OUTWARD.tick_inner)));
    assert_eq!(tick_starts(&gauge).len(), 1);
    assert_eq!(gauge.surface().transform(), gauge.local_frame());
}

// === Rim ===

#[test]
fn rim_arcs_cover_the_span_contiguously() {
    let config = GaugeConfig::builder()
        .delta_angle(4.0)
        .first_aperture_range(0.75)
        .second_aperture_range(0.5)
        .rim_border_width(6.0)
        .build();
    let gauge = gauge_with(&["a", "b", "c"], config);
    let rim_radius = gauge.radius() * RIM_RADIUS_FACTOR;
    let redraw = last_redraw(gauge.surface());

    let arcs: Vec<(f64, f64)> = redraw
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Arc {
                radius, start, end, ..
            } if *radius == rim_radius => Some((*start, *end)),
            _ => None,
        })
        .collect();
    assert_eq!(arcs.len(), 3);
    assert_eq!(arcs[0].0, 0.0);
    assert_eq!(arcs[0].1, arcs[1].0);
    assert_eq!(arcs[1].1, arcs[2].0);
    assert_eq!(arcs[2].1, 4.0);
    assert!(approx_eq(arcs[1].1 - arcs[1].0, 0.75));
    assert!(approx_eq(arcs[2].1 - arcs[2].0, 0.5));

    let strokes: Vec<StrokeStyle> = redraw
        .iter()
        .filter_map(|c| match c {
            DrawCommand::StrokeStyle(style) => Some(*style),
            _ => None,
        })
        .take(3)
        .collect();
    assert_eq!(
        strokes,
        [
            StrokeStyle::new(Color::GREY, 6.0),
            StrokeStyle::new(Color::ORANGE, 6.0),
            StrokeStyle::new(Color::RED, 6.0),
        ]
    );
}

// === Tick labels ===

fn tick_starts(gauge: &Gauge<Scene>) -> Vec<f64> {
    last_redraw(gauge.surface())
        .iter()
        .filter_map(|c| match c {
            DrawCommand::MoveTo { x, y } if *y == 0.0 => Some(*x),
            _ => None,
        })
        .collect()
}

#[test]
fn label_placement_depends_on_title_reverse() {
    let outward = gauge_with(&["a", "b", "c"], GaugeConfig::default());
    let inward = gauge_with(
        &["a", "b", "c"],
        GaugeConfig::builder().title_reverse(true).build(),
    );
    let radius = outward.radius();

    let outer_ticks = tick_starts(&outward);
    let inner_ticks = tick_starts(&inward);
    assert_eq!(outer_ticks.len(), 3);
    assert_eq!(inner_ticks.len(), 3);
    assert!(outer_ticks
        .iter()
        .all(|x| approx_eq(*x, radius * LabelPlacement::OUTWARD.tick_inner)));
    assert!(inner_ticks
        .iter()
        .all(|x| approx_eq(*x, radius * LabelPlacement::INWARD.tick_inner)));
    assert!(inner_ticks[0] < radius * RIM_RADIUS_FACTOR);
    assert!(outer_ticks[0] > radius * RIM_RADIUS_FACTOR);
}

/// Label text with the transform it was drawn under.
fn label_anchors(gauge: &Gauge<Scene>) -> Vec<(String, Transform)> {
    let mut transform = None;
    let mut anchors = Vec::new();
    for command in last_redraw(gauge.surface()) {
        match command {
            DrawCommand::SetTransform(t) => transform = Some(*t),
            DrawCommand::FillText { text, x, y } => {
                assert_eq!((*x, *y), (0.0, 0.0));
                anchors.push((text.clone(), transform.unwrap()));
            }
            _ => {}
        }
    }
    anchors
}

fn assert_upright_at(gauge: &Gauge<Scene>, init_angle: f64, label_factor: f64) {
    let radius = gauge.radius();
    let anchors = label_anchors(gauge);
    assert_eq!(anchors.len(), 3);
    for (index, (text, t)) in anchors.iter().enumerate() {
        assert_eq!(text, ["a", "b", "c"][index]);
        // Text renders with no rotation in device space.
        assert!(approx_eq(t.b, 0.0) && approx_eq(t.a, 1.0));
        let angle = init_angle + gauge.angle_of(index as isize);
        let (x, y) = t.apply(0.0, 0.0);
        assert!(approx_eq(x, 120.0 + radius * label_factor * angle.cos()));
        assert!(approx_eq(y, 100.0 + radius * label_factor * angle.sin()));
    }
}

#[test]
fn labels_are_drawn_upright_at_their_anchor() {
    let config = GaugeConfig::builder().init_angle(0.9).build();
    let gauge = gauge_with(&["a", "b", "c"], config);
    assert_upright_at(&gauge, 0.9, LabelPlacement::OUTWARD.label);
    assert!(approx_eq(LabelPlacement::OUTWARD.label, 0.95));
}

#[test]
fn reversed_labels_sit_inside_the_rim() {
    let config = GaugeConfig::builder()
        .init_angle(-0.4)
        .title_reverse(true)
        .build();
    let gauge = gauge_with(&["a", "b", "c"], config);
    assert_upright_at(&gauge, -0.4, LabelPlacement::INWARD.label);
    assert!(approx_eq(LabelPlacement::INWARD.label, 0.65));
}
