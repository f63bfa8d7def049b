// ============================================================================
// SOFTWARE RASTER SURFACE
// ============================================================================

use std::f64::consts::TAU;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::color::Color;
use crate::error::GaugeError;
use crate::surface::{FillStyle, StrokeStyle, Surface, TextAlign, TextBaseline, TextStyle};
use crate::transform::Transform;

/// Upper bound on segments used to flatten one arc.
const MAX_ARC_SEGMENTS: f64 = 4096.0;

#[derive(Debug, Clone, Default)]
struct Subpath {
    // Device coordinates
    points: Vec<(f64, f64)>,
    closed: bool,
}

/// RGBA8 frame buffer implementing [`Surface`].
///
/// Paths are flattened into device space as they are built, so a transform
/// change between path calls affects only the later calls, like a canvas.
pub struct Canvas {
    frame: Vec<u8>,
    width: u32,
    height: u32,
    background: Color,
    transform: Transform,
    stroke_style: StrokeStyle,
    fill_style: FillStyle,
    text_style: TextStyle,
    path: Vec<Subpath>,
    font: Option<Font<'static>>,
    warned_missing_font: bool,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            frame: vec![0; width as usize * height as usize * 4],
            width,
            height,
            background: Color::WHITE,
            transform: Transform::IDENTITY,
            stroke_style: StrokeStyle::new(Color::BLACK, 1.0),
            fill_style: FillStyle::new(Color::BLACK),
            text_style: TextStyle {
                font: Default::default(),
                color: Color::BLACK,
                align: TextAlign::default(),
                baseline: TextBaseline::default(),
            },
            path: Vec::new(),
            font: None,
            warned_missing_font: false,
        };
        canvas.fill_background();
        canvas
    }

    /// Repaints the whole frame with `color`, which `clear_rect` also uses.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self.fill_background();
        self
    }

    /// Loads a TrueType/OpenType font used by `fill_text`.
    pub fn with_font_data(mut self, data: Vec<u8>) -> Result<Self, GaugeError> {
        let font = Font::try_from_vec(data)
            .ok_or_else(|| GaugeError::Font("unsupported or corrupt font data".to_string()))?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn into_frame(self) -> Vec<u8> {
        self.frame
    }

    /// RGBA of one pixel, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(rgba)
    }

    fn fill_background(&mut self) {
        let Color { r, g, b } = self.background;
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[r, g, b, 0xff]);
        }
    }

    /// Open subpath to extend, starting a new one at the last closed start if needed.
    fn current_subpath(&mut self) -> Option<&mut Subpath> {
        let restart = match self.path.last() {
            Some(subpath) if subpath.closed => subpath.points.first().copied(),
            _ => None,
        };
        if let Some(start) = restart {
            self.path.push(Subpath {
                points: vec![start],
                closed: false,
            });
        }
        self.path.last_mut()
    }

    fn device_point(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (dx, dy) = self.transform.apply(x, y);
        (dx.is_finite() && dy.is_finite()).then_some((dx, dy))
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn set_stroke_style(&mut self, style: StrokeStyle) {
        self.stroke_style = style;
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.fill_style = style;
    }

    fn set_text_style(&mut self, style: TextStyle) {
        self.text_style = style;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        if let Some(p) = self.device_point(x, y) {
            self.path.push(Subpath {
                points: vec![p],
                closed: false,
            });
        }
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let Some(p) = self.device_point(x, y) else {
            return;
        };
        match self.current_subpath() {
            Some(subpath) => subpath.points.push(p),
            None => self.path.push(Subpath {
                points: vec![p],
                closed: false,
            }),
        }
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        let sweep = arc_sweep(start, end, anticlockwise);
        if ![cx, cy, radius, start, sweep].iter().all(|v| v.is_finite()) || radius < 0.0 {
            return;
        }
        let device_radius = radius * self.transform.scale();
        let segments = (sweep.abs() * device_radius / 2.0)
            .ceil()
            .clamp(1.0, MAX_ARC_SEGMENTS) as usize;
        let points: Vec<(f64, f64)> = (0..=segments)
            .filter_map(|i| {
                let angle = start + sweep * i as f64 / segments as f64;
                self.device_point(cx + radius * angle.cos(), cy + radius * angle.sin())
            })
            .collect();
        match self.current_subpath() {
            Some(subpath) if !subpath.points.is_empty() => subpath.points.extend(points),
            _ => self.path.push(Subpath {
                points,
                closed: false,
            }),
        }
    }

    fn close_path(&mut self) {
        if let Some(subpath) = self.path.last_mut() {
            subpath.closed = true;
        }
    }

    fn stroke(&mut self) {
        let thickness = (self.stroke_style.width * self.transform.scale()) as f32;
        if !thickness.is_finite() || thickness <= 0.0 {
            return;
        }
        let color = self.stroke_style.color;
        for subpath in &self.path {
            let closing = subpath
                .closed
                .then(|| Some((*subpath.points.last()?, *subpath.points.first()?)))
                .flatten();
            let segments = subpath
                .points
                .windows(2)
                .map(|w| (w[0], w[1]))
                .chain(closing);
            for (from, to) in segments {
                draw_thick_line_aa(
                    &mut self.frame,
                    self.width,
                    self.height,
                    from,
                    to,
                    thickness,
                    color,
                );
            }
        }
    }

    fn fill(&mut self) {
        let edges: Vec<((f64, f64), (f64, f64))> = self
            .path
            .iter()
            .filter(|subpath| subpath.points.len() > 2)
            .flat_map(|subpath| {
                let n = subpath.points.len();
                (0..n).map(move |i| (subpath.points[i], subpath.points[(i + 1) % n]))
            })
            .collect();
        fill_polygon(&mut self.frame, self.width, self.height, &edges, self.fill_style.color);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let Canvas {
            frame,
            width,
            height,
            transform,
            text_style,
            font,
            warned_missing_font,
            ..
        } = self;
        let Some(font) = font.as_ref() else {
            if !*warned_missing_font {
                log::warn!("no font loaded, text such as {text:?} is not rendered");
                *warned_missing_font = true;
            }
            return;
        };
        if !transform.is_finite() {
            return;
        }
        draw_text(
            frame,
            *width,
            *height,
            transform,
            (x, y),
            text,
            font,
            text_style,
        );
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(inverse) = self.transform.invert() else {
            return;
        };
        let (x0, x1) = (x.min(x + width), x.max(x + width));
        let (y0, y1) = (y.min(y + height), y.max(y + height));
        let corners = [(x0, y0), (x1, y0), (x0, y1), (x1, y1)]
            .map(|(cx, cy)| self.transform.apply(cx, cy));
        let Some((min_x, min_y, max_x, max_y)) =
            clip_bounds(&corners, 0.0, self.width, self.height)
        else {
            return;
        };
        let Color { r, g, b } = self.background;
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let (lx, ly) = inverse.apply(px as f64 + 0.5, py as f64 + 0.5);
                if lx >= x0 && lx <= x1 && ly >= y0 && ly <= y1 {
                    let idx = (py as usize * self.width as usize + px as usize) * 4;
                    self.frame[idx..idx + 4].copy_from_slice(&[r, g, b, 0xff]);
                }
            }
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Signed sweep of a canvas arc: clockwise sweeps land in `[0, TAU)` unless
/// the requested span already covers a full turn.
fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    let (delta, sign) = if anticlockwise {
        (start - end, -1.0)
    } else {
        (end - start, 1.0)
    };
    if delta >= TAU {
        sign * TAU
    } else {
        sign * delta.rem_euclid(TAU)
    }
}

/// Pixel bounding box of `points` grown by `pad`, clipped to the frame.
fn clip_bounds(
    points: &[(f64, f64)],
    pad: f64,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    if width == 0 || height == 0 || points.is_empty() {
        return None;
    }
    let (min_x, min_y, max_x, max_y) = points.iter().fold(
        (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |(min_x, min_y, max_x, max_y), &(x, y)| {
            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
        },
    );
    let (min_x, min_y) = ((min_x - pad).floor(), (min_y - pad).floor());
    let (max_x, max_y) = ((max_x + pad).ceil(), (max_y + pad).ceil());
    if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite())
        || max_x < 0.0
        || max_y < 0.0
        || min_x >= width as f64
        || min_y >= height as f64
    {
        return None;
    }
    Some((
        min_x.max(0.0) as u32,
        min_y.max(0.0) as u32,
        max_x.min(width as f64 - 1.0) as u32,
        max_y.min(height as f64 - 1.0) as u32,
    ))
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn set_pixel(frame: &mut [u8], width: u32, x: u32, y: u32, color: Color, alpha: f32) {
    let idx = (y as usize * width as usize + x as usize) * 4;
    if x >= width || idx + 4 > frame.len() {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    let src = [color.r as f32, color.g as f32, color.b as f32];
    for (channel, value) in src.iter().enumerate() {
        let dst = frame[idx + channel] as f32;
        frame[idx + channel] = (value * a + dst * (1.0 - a)).round() as u8;
    }
    frame[idx + 3] = 0xff;
}

fn draw_thick_line_aa(
    frame: &mut [u8],
    width: u32,
    height: u32,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    thickness: f32,
    color: Color,
) {
    let half = f64::from(thickness) / 2.0;
    let Some((min_x, min_y, max_x, max_y)) =
        clip_bounds(&[(x0, y0), (x1, y1)], half + 1.0, width, height)
    else {
        return;
    };
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (cx, cy) = (x as f64 + 0.5, y as f64 + 0.5);
            let t = if len_sq > 0.0 {
                (((cx - x0) * dx + (cy - y0) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = (x0 + t * dx - cx).hypot(y0 + t * dy - cy);
            let aa = (1.0 - (dist - half).clamp(0.0, 1.0)) as f32;
            if aa > 0.01 {
                set_pixel(frame, width, x, y, color, aa);
            }
        }
    }
}

/// Non-zero winding fill with 2x2 supersampling.
fn fill_polygon(
    frame: &mut [u8],
    width: u32,
    height: u32,
    edges: &[((f64, f64), (f64, f64))],
    color: Color,
) {
    let points: Vec<(f64, f64)> = edges.iter().map(|(from, _)| *from).collect();
    let Some((min_x, min_y, max_x, max_y)) = clip_bounds(&points, 1.0, width, height) else {
        return;
    };
    const SAMPLES: [(f64, f64); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let covered = SAMPLES
                .iter()
                .filter(|(sx, sy)| winding_number(edges, x as f64 + sx, y as f64 + sy) != 0)
                .count();
            if covered > 0 {
                set_pixel(frame, width, x, y, color, covered as f32 / SAMPLES.len() as f32);
            }
        }
    }
}

fn winding_number(edges: &[((f64, f64), (f64, f64))], px: f64, py: f64) -> i32 {
    edges.iter().fold(0, |winding, &((x0, y0), (x1, y1))| {
        let side = (x1 - x0) * (py - y0) - (px - x0) * (y1 - y0);
        if y0 <= py {
            if y1 > py && side > 0.0 {
                return winding + 1;
            }
        } else if y1 <= py && side < 0.0 {
            return winding - 1;
        }
        winding
    })
}

#[allow(clippy::too_many_arguments)]
fn draw_text(
    frame: &mut [u8],
    width: u32,
    height: u32,
    transform: &Transform,
    (x, y): (f64, f64),
    text: &str,
    font: &Font<'static>,
    style: &TextStyle,
) {
    let scale = Scale::uniform(style.font.size);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
    let advance = glyphs
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0) as f64;
    let offset_x = match style.align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -advance / 2.0,
        TextAlign::Right => -advance,
    };
    let offset_y = f64::from(match style.baseline {
        TextBaseline::Top => v_metrics.ascent,
        TextBaseline::Middle => (v_metrics.ascent + v_metrics.descent) / 2.0,
        TextBaseline::Alphabetic => 0.0,
        TextBaseline::Bottom => v_metrics.descent,
    });
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                if v > 0.001 {
                    let lx = x + offset_x + f64::from(bb.min.x) + f64::from(gx) + 0.5;
                    let ly = y + offset_y + f64::from(bb.min.y) + f64::from(gy) + 0.5;
                    let (dx, dy) = transform.apply(lx, ly);
                    draw_antialiased_pixel(
                        frame,
                        width,
                        height,
                        dx - 0.5,
                        dy - 0.5,
                        style.color,
                        v,
                    );
                }
            });
        }
    }
}

fn draw_antialiased_pixel(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: f64,
    y: f64,
    color: Color,
    alpha: f32,
) {
    if !x.is_finite() || !y.is_finite() {
        return;
    }
    let x_floor = x.floor();
    let y_floor = y.floor();
    let x_frac = x - x_floor;
    let y_frac = y - y_floor;

    // Bilinear spread over the four nearest pixels
    let samples = [
        (x_floor, y_floor, (1.0 - x_frac) * (1.0 - y_frac)),
        (x_floor + 1.0, y_floor, x_frac * (1.0 - y_frac)),
        (x_floor, y_floor + 1.0, (1.0 - x_frac) * y_frac),
        (x_floor + 1.0, y_floor + 1.0, x_frac * y_frac),
    ];

    for (px, py, weight) in samples {
        if px >= 0.0 && px < width as f64 && py >= 0.0 && py < height as f64 {
            let final_alpha = alpha * weight as f32;
            if final_alpha > 0.001 {
                set_pixel(frame, width, px as u32, py as u32, color, final_alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_background_colored() {
        let canvas = Canvas::new(4, 3).with_background(Color::new(1, 2, 3));
        assert_eq!(canvas.frame().len(), 4 * 3 * 4);
        assert_eq!(canvas.pixel(3, 2), Some([1, 2, 3, 0xff]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn arc_sweep_follows_canvas_rules() {
        assert!((arc_sweep(0.0, 1.0, false) - 1.0).abs() < 1e-12);
        assert!((arc_sweep(0.0, 7.0, false) - TAU).abs() < 1e-12);
        assert!((arc_sweep(1.0, 0.0, false) - (TAU - 1.0)).abs() < 1e-12);
        assert!((arc_sweep(0.0, 1.0, true) + (TAU - 1.0)).abs() < 1e-12);
        assert_eq!(arc_sweep(2.0, 2.0, false), 0.0);
    }

    #[test]
    fn fill_covers_interior_only() {
        let mut canvas = Canvas::new(20, 20);
        canvas.set_fill_style(FillStyle::new(Color::RED));
        canvas.begin_path();
        canvas.move_to(5.0, 5.0);
        canvas.line_to(15.0, 5.0);
        canvas.line_to(15.0, 15.0);
        canvas.line_to(5.0, 15.0);
        canvas.close_path();
        canvas.fill();
        assert_eq!(canvas.pixel(10, 10), Some([0xff, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(2, 2), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn stroke_uses_transform() {
        let mut canvas = Canvas::new(40, 40);
        canvas.translate(20.0, 20.0);
        canvas.set_stroke_style(StrokeStyle::new(Color::BLUE, 3.0));
        canvas.begin_path();
        canvas.move_to(0.0, 0.0);
        canvas.line_to(10.0, 0.0);
        canvas.stroke();
        assert_eq!(canvas.pixel(25, 20), Some([0, 0, 0xff, 0xff]));
        assert_eq!(canvas.pixel(5, 5), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn clear_rect_restores_background_in_rotated_frame() {
        let mut canvas = Canvas::new(30, 30).with_background(Color::WHITE);
        canvas.set_fill_style(FillStyle::new(Color::BLACK));
        canvas.begin_path();
        canvas.move_to(0.0, 0.0);
        canvas.line_to(30.0, 0.0);
        canvas.line_to(30.0, 30.0);
        canvas.line_to(0.0, 30.0);
        canvas.fill();
        assert_eq!(canvas.pixel(15, 15), Some([0, 0, 0, 0xff]));

        canvas.translate(15.0, 15.0);
        canvas.rotate(0.7);
        canvas.clear_rect(-5.0, -5.0, 10.0, 10.0);
        assert_eq!(canvas.pixel(15, 15), Some([0xff, 0xff, 0xff, 0xff]));
        assert_eq!(canvas.pixel(1, 1), Some([0, 0, 0, 0xff]));
    }

    #[test]
    fn non_finite_geometry_is_ignored() {
        let mut canvas = Canvas::new(10, 10);
        canvas.set_stroke_style(StrokeStyle::new(Color::BLACK, 2.0));
        canvas.begin_path();
        canvas.arc(5.0, 5.0, 3.0, 0.0, f64::NAN, false);
        canvas.move_to(f64::INFINITY, 0.0);
        canvas.line_to(f64::NAN, 1.0);
        canvas.stroke();
        canvas.fill();
        assert!(canvas.frame().chunks_exact(4).all(|px| px == [0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn text_without_font_is_a_no_op() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_text("42", 5.0, 5.0);
        assert!(canvas.frame().chunks_exact(4).all(|px| px == [0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn corrupt_font_data_is_rejected() {
        let result = Canvas::new(10, 10).with_font_data(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(GaugeError::Font(_))));
    }
}
