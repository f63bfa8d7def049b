// ============================================================================
// CRATE MODULES & RE-EXPORTS
// ============================================================================
//
// Circular analog gauge: a rim with two colored aperture zones, evenly
// spaced tick labels and a hand pointing at one value out of a fixed list.
// A `Gauge` paints onto any `Surface`; the crate ships a software `Canvas`
// (shown on screen by `GaugeWindow`) and a recording `Scene`.

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod gauge;
pub mod render;
pub mod scene;
pub mod surface;
pub mod transform;
pub mod viewer;

pub use canvas::Canvas;
pub use color::Color;
pub use config::{labels, FontSpec, GaugeConfig, Label};
pub use error::{GaugeError, ParseColorError, ParseFontError};
pub use gauge::Gauge;
pub use scene::{DrawCommand, Scene};
pub use surface::{
    FillStyle, StrokeStyle, Surface, SurfaceSource, TextAlign, TextBaseline, TextStyle,
};
pub use transform::{Transform, TransformScope};
pub use viewer::{GaugeCommand, GaugeWindow};
