// ============================================================================
// DRAWING SURFACE
// ============================================================================
//
// The immediate-mode 2D drawing surface a gauge paints on.

use std::collections::HashMap;

use crate::color::Color;
use crate::config::FontSpec;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl StrokeStyle {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: Color,
}

impl FillStyle {
    pub const fn new(color: Color) -> Self {
        Self { color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Alphabetic,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    pub color: Color,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

/// Stateful drawing target with a canvas-style path model.
///
/// Transform and style state persist between calls until changed. Paths are
/// built with `begin_path`/`move_to`/`line_to`/`arc`/`close_path` and painted
/// with `stroke` or `fill` using the most recently applied style record.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn transform(&self) -> Transform;
    fn set_transform(&mut self, transform: Transform);

    fn translate(&mut self, x: f64, y: f64) {
        let transform = self.transform().translate(x, y);
        self.set_transform(transform);
    }

    fn rotate(&mut self, angle: f64) {
        let transform = self.transform().rotate(angle);
        self.set_transform(transform);
    }

    fn set_stroke_style(&mut self, style: StrokeStyle);
    fn set_fill_style(&mut self, style: FillStyle);
    fn set_text_style(&mut self, style: TextStyle);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Circular arc around `(cx, cy)`, angles in radians, clockwise unless `anticlockwise`.
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool);
    fn close_path(&mut self);

    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn width(&self) -> u32 {
        (**self).width()
    }
    fn height(&self) -> u32 {
        (**self).height()
    }
    fn transform(&self) -> Transform {
        (**self).transform()
    }
    fn set_transform(&mut self, transform: Transform) {
        (**self).set_transform(transform)
    }
    fn set_stroke_style(&mut self, style: StrokeStyle) {
        (**self).set_stroke_style(style)
    }
    fn set_fill_style(&mut self, style: FillStyle) {
        (**self).set_fill_style(style)
    }
    fn set_text_style(&mut self, style: TextStyle) {
        (**self).set_text_style(style)
    }
    fn begin_path(&mut self) {
        (**self).begin_path()
    }
    fn move_to(&mut self, x: f64, y: f64) {
        (**self).move_to(x, y)
    }
    fn line_to(&mut self, x: f64, y: f64) {
        (**self).line_to(x, y)
    }
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        (**self).arc(cx, cy, radius, start, end, anticlockwise)
    }
    fn close_path(&mut self) {
        (**self).close_path()
    }
    fn stroke(&mut self) {
        (**self).stroke()
    }
    fn fill(&mut self) {
        (**self).fill()
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        (**self).fill_text(text, x, y)
    }
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        (**self).clear_rect(x, y, width, height)
    }
}

/// Resolves a selector to a drawing surface owned by the caller.
pub trait SurfaceSource {
    type Surface: Surface;

    fn acquire(&mut self, selector: &str) -> Option<Self::Surface>;
}

/// Named surfaces; acquiring one hands over ownership.
impl<S: Surface> SurfaceSource for HashMap<String, S> {
    type Surface = S;

    fn acquire(&mut self, selector: &str) -> Option<S> {
        self.remove(selector)
    }
}
