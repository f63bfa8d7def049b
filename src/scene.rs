// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use crate::surface::{FillStyle, StrokeStyle, Surface, TextStyle};
use crate::transform::Transform;

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    SetTransform(Transform),
    StrokeStyle(StrokeStyle),
    FillStyle(FillStyle),
    TextStyle(TextStyle),
    BeginPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    ClosePath,
    Stroke,
    Fill,
    FillText {
        text: String,
        x: f64,
        y: f64,
    },
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// A surface that draws nothing and records every call in order.
///
/// Tracks the transform so the recorded stream can be inspected or
/// replayed onto a real surface with [`Scene::render`].
#[derive(Clone, Debug)]
pub struct Scene {
    width: u32,
    height: u32,
    transform: Transform,
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            transform: Transform::IDENTITY,
            commands: Vec::new(),
        }
    }

    fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forgets recorded commands; the current transform is kept.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn render<T: Surface + ?Sized>(&self, target: &mut T) {
        for command in &self.commands {
            match command {
                DrawCommand::SetTransform(transform) => target.set_transform(*transform),
                DrawCommand::StrokeStyle(style) => target.set_stroke_style(*style),
                DrawCommand::FillStyle(style) => target.set_fill_style(*style),
                DrawCommand::TextStyle(style) => target.set_text_style(style.clone()),
                DrawCommand::BeginPath => target.begin_path(),
                DrawCommand::MoveTo { x, y } => target.move_to(*x, *y),
                DrawCommand::LineTo { x, y } => target.line_to(*x, *y),
                DrawCommand::Arc {
                    cx,
                    cy,
                    radius,
                    start,
                    end,
                    anticlockwise,
                } => target.arc(*cx, *cy, *radius, *start, *end, *anticlockwise),
                DrawCommand::ClosePath => target.close_path(),
                DrawCommand::Stroke => target.stroke(),
                DrawCommand::Fill => target.fill(),
                DrawCommand::FillText { text, x, y } => target.fill_text(text, *x, *y),
                DrawCommand::ClearRect {
                    x,
                    y,
                    width,
                    height,
                } => target.clear_rect(*x, *y, *width, *height),
            }
        }
    }
}

impl Surface for Scene {
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
        self.add_command(DrawCommand::SetTransform(transform));
    }

    fn set_stroke_style(&mut self, style: StrokeStyle) {
        self.add_command(DrawCommand::StrokeStyle(style));
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.add_command(DrawCommand::FillStyle(style));
    }

    fn set_text_style(&mut self, style: TextStyle) {
        self.add_command(DrawCommand::TextStyle(style));
    }

    fn begin_path(&mut self) {
        self.add_command(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.add_command(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.add_command(DrawCommand::LineTo { x, y });
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        self.add_command(DrawCommand::Arc {
            cx,
            cy,
            radius,
            start,
            end,
            anticlockwise,
        });
    }

    fn close_path(&mut self) {
        self.add_command(DrawCommand::ClosePath);
    }

    fn stroke(&mut self) {
        self.add_command(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.add_command(DrawCommand::Fill);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.add_command(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.add_command(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        });
    }
}
