use std::f64::consts::PI;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::color::Color;
use crate::error::{GaugeError, ParseFontError};

// ============================================================================
// LABELS
// ============================================================================

/// One tick position on the gauge, shown as its text.
///
/// Equality is exact and type-sensitive: `Text("1")` never equals `Number(1.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(f64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Text(text) => f.write_str(text),
            Label::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Label::Number(n) if *n == 0.0 => f.write_str("0"),
            Label::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Label::Text(text.to_string())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Label::Text(text)
    }
}

impl From<f64> for Label {
    fn from(n: f64) -> Self {
        Label::Number(n)
    }
}

impl From<i32> for Label {
    fn from(n: i32) -> Self {
        Label::Number(f64::from(n))
    }
}

impl From<u32> for Label {
    fn from(n: u32) -> Self {
        Label::Number(f64::from(n))
    }
}

/// Collects anything label-like into the `values` list of a [`GaugeConfig`].
pub fn labels<I>(items: I) -> Vec<Label>
where
    I: IntoIterator,
    I::Item: Into<Label>,
{
    items.into_iter().map(Into::into).collect()
}

// ============================================================================
// FONT
// ============================================================================

/// CSS-like font shorthand: `"[style...] <size>px <family>"`, e.g. `"15px arial"`.
#[derive(Debug, Clone, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub struct FontSpec {
    pub style: Option<String>,
    pub size: f32,
    pub family: String,
}

impl FontSpec {
    pub fn new(size: f32, family: impl Into<String>) -> Self {
        Self {
            style: None,
            size,
            family: family.into(),
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(15.0, "arial")
    }
}

impl FromStr for FontSpec {
    type Err = ParseFontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let size_at = tokens
            .iter()
            .position(|t| t.ends_with("px"))
            .ok_or_else(|| ParseFontError::MissingSize(s.to_string()))?;
        let size = tokens[size_at]
            .trim_end_matches("px")
            .parse::<f32>()
            .ok()
            .filter(|size| size.is_finite() && *size > 0.0)
            .ok_or_else(|| ParseFontError::InvalidSize(s.to_string()))?;
        let style = (size_at > 0).then(|| tokens[..size_at].join(" "));
        let family = match tokens[size_at + 1..].join(" ") {
            family if family.is_empty() => "sans-serif".to_string(),
            family => family,
        };
        Ok(Self {
            style,
            size,
            family,
        })
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(style) = &self.style {
            write!(f, "{style} ")?;
        }
        write!(f, "{}px {}", self.size, self.family)
    }
}

// ============================================================================
// GAUGE CONFIGURATION
// ============================================================================

/// Full gauge configuration. Unset builder fields and keys missing from a
/// TOML document fall back to the defaults below; `values` is always
/// replaced as a whole.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    // Ticks, in display order
    #[builder(default)]
    pub values: Vec<Label>,
    pub init_value: Option<Label>,

    // Orientation (radians)
    #[builder(default = 5.0 / 6.0 * PI)]
    pub init_angle: f64,
    #[builder(default = 4.0 / 3.0 * PI)]
    pub delta_angle: f64,

    // Hand
    #[builder(default = 10.0)]
    pub hand_radius: f64,
    #[builder(default = 5.0)]
    pub hand_delta: f64,
    #[builder(default = Color::BLUE)]
    pub hand_color: Color,

    // Rim
    #[builder(default = 3.0)]
    pub rim_border_width: f64,
    #[builder(default = Color::GREY)]
    pub rim_color: Color,

    // Tick labels
    #[builder(default = false)]
    pub title_reverse: bool,
    #[builder(default)]
    pub font: FontSpec,

    // Apertures, taken from the end of the arc
    #[builder(default = PI / 4.0)]
    pub first_aperture_range: f64,
    #[builder(default = Color::ORANGE)]
    pub first_aperture_color: Color,
    #[builder(default = PI / 4.0)]
    pub second_aperture_range: f64,
    #[builder(default = Color::RED)]
    pub second_aperture_color: Color,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    /// Resets `init_value` to the first value when it is not one of `values`.
    pub fn normalized(mut self) -> Self {
        let known = self
            .init_value
            .as_ref()
            .is_some_and(|init| self.values.contains(init));
        if !known {
            self.init_value = self.values.first().cloned();
        }
        self
    }

    /// Position of `value` in `values`, first occurrence wins.
    pub fn index_of(&self, value: &Label) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, GaugeError> {
        let config: GaugeConfig = toml::from_str(source)?;
        Ok(config.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GaugeError> {
        let source = fs_err::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&source)?;
        log::debug!(
            "loaded gauge config from {} ({} values)",
            path.as_ref().display(),
            config.values.len()
        );
        Ok(config)
    }
}
