use thiserror::Error;

/// Errors raised while building or showing a gauge.
///
/// Only resource acquisition fails loudly. Malformed gauge geometry (empty
/// value lists, oversized apertures, unknown selections) is never an error.
#[derive(Error, Debug)]
pub enum GaugeError {
    #[error("could not create drawing surface: {0}")]
    Surface(String),
    #[error("could not load font: {0}")]
    Font(String),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window error: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("pixels error: {0}")]
    Pixels(#[from] pixels::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown color `{0}`")]
pub struct ParseColorError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFontError {
    #[error("font `{0}` has no pixel size (expected e.g. `15px arial`)")]
    MissingSize(String),
    #[error("font `{0}` has an invalid pixel size")]
    InvalidSize(String),
}
