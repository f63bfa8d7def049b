// ============================================================================
// RENDERING AND DRAWING FUNCTIONS
// ============================================================================
//
// Everything here draws in the gauge-local frame: origin at the surface
// centre, x-axis along the zero direction of the arc.

use std::f64::consts::TAU;

use crate::color::Color;
use crate::config::GaugeConfig;
use crate::surface::{FillStyle, StrokeStyle, Surface, TextAlign, TextBaseline, TextStyle};
use crate::transform::TransformScope;

/// Rim arc radius as a fraction of the gauge radius.
pub const RIM_RADIUS_FACTOR: f64 = 0.8;
/// Hand tip distance as a fraction of the gauge radius.
pub const HAND_LENGTH_FACTOR: f64 = 0.92;
pub const TICK_LINE_WIDTH: f64 = 2.0;
pub const HUB_OUTLINE_WIDTH: f64 = 2.0;

/// Linear angle of tick `n` out of `count`: `n / (count - 1) * delta_angle`.
///
/// Not guarded: a single tick gives `0 / 0` (a NaN rotation, ignored by
/// surfaces), and `n = -1` lands before the arc.
pub fn tick_angle(count: usize, delta_angle: f64, n: isize) -> f64 {
    (n as f64 / (count as f64 - 1.0)) * delta_angle
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RimSegment {
    pub start: f64,
    pub end: f64,
    pub color: Color,
}

/// Neutral, first aperture and second aperture arcs, in drawing order.
pub fn rim_segments(config: &GaugeConfig) -> [RimSegment; 3] {
    let neutral_end =
        config.delta_angle - config.first_aperture_range - config.second_aperture_range;
    let first_end = neutral_end + config.first_aperture_range;
    [
        RimSegment {
            start: 0.0,
            end: neutral_end,
            color: config.rim_color,
        },
        RimSegment {
            start: neutral_end,
            end: first_end,
            color: config.first_aperture_color,
        },
        RimSegment {
            start: first_end,
            end: config.delta_angle,
            color: config.second_aperture_color,
        },
    ]
}

/// Radii (as fractions of the gauge radius) of a tick mark and its label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub tick_inner: f64,
    pub tick_outer: f64,
    pub label: f64,
}

impl LabelPlacement {
    /// Ticks outside the rim, labels further out.
    pub const OUTWARD: LabelPlacement = LabelPlacement {
        tick_inner: 0.85,
        tick_outer: 0.89,
        label: 0.95,
    };
    /// Ticks inside the rim, labels closer to the centre.
    pub const INWARD: LabelPlacement = LabelPlacement {
        tick_inner: 0.71,
        tick_outer: 0.75,
        label: 0.65,
    };

    pub fn for_config(config: &GaugeConfig) -> Self {
        if config.title_reverse {
            Self::INWARD
        } else {
            Self::OUTWARD
        }
    }
}

pub(crate) fn draw_rim<S: Surface + ?Sized>(surface: &mut S, config: &GaugeConfig, radius: f64) {
    let rim_radius = radius * RIM_RADIUS_FACTOR;
    for segment in rim_segments(config) {
        surface.set_stroke_style(StrokeStyle::new(segment.color, config.rim_border_width));
        surface.begin_path();
        surface.arc(0.0, 0.0, rim_radius, segment.start, segment.end, false);
        surface.stroke();
        surface.close_path();
    }
}

pub(crate) fn draw_ticks<S: Surface + ?Sized>(surface: &mut S, config: &GaugeConfig, radius: f64) {
    let placement = LabelPlacement::for_config(config);
    let label_radius = radius * placement.label;
    let text_style = TextStyle {
        font: config.font.clone(),
        color: config.rim_color,
        align: TextAlign::Center,
        baseline: TextBaseline::Middle,
    };

    for (index, label) in config.values.iter().enumerate() {
        let angle = tick_angle(config.values.len(), config.delta_angle, index as isize);

        let mut tick = TransformScope::new(&mut *surface);
        tick.rotate(angle);

        tick.set_stroke_style(StrokeStyle::new(config.rim_color, TICK_LINE_WIDTH));
        tick.begin_path();
        tick.move_to(radius * placement.tick_inner, 0.0);
        tick.line_to(radius * placement.tick_outer, 0.0);
        tick.close_path();
        tick.stroke();

        // Counter-rotate so the text stays upright whatever the gauge orientation.
        let mut anchor = TransformScope::new(&mut *tick);
        anchor.translate(label_radius, 0.0);
        anchor.rotate(-(config.init_angle + angle));
        anchor.set_text_style(text_style.clone());
        anchor.fill_text(&label.to_string(), 0.0, 0.0);
    }
}

pub(crate) fn draw_hand<S: Surface + ?Sized>(
    surface: &mut S,
    config: &GaugeConfig,
    radius: f64,
    angle: f64,
) {
    surface.set_stroke_style(StrokeStyle::new(config.hand_color, HUB_OUTLINE_WIDTH));
    surface.set_fill_style(FillStyle::new(config.hand_color));
    surface.begin_path();
    surface.arc(0.0, 0.0, config.hand_radius, 0.0, TAU, false);
    surface.stroke();
    surface.close_path();
    surface.fill();

    let mut wedge = TransformScope::new(surface);
    wedge.rotate(angle);
    wedge.begin_path();
    wedge.move_to(0.0, -config.hand_delta);
    wedge.line_to(radius * HAND_LENGTH_FACTOR, 0.0);
    wedge.line_to(0.0, config.hand_delta);
    wedge.close_path();
    wedge.fill();
}
