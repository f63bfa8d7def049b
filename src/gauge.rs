use crate::config::{GaugeConfig, Label};
use crate::error::GaugeError;
use crate::render::{draw_hand, draw_rim, draw_ticks, tick_angle};
use crate::surface::{Surface, SurfaceSource};
use crate::transform::Transform;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Analog gauge bound to a drawing surface.
///
/// Construction orients the surface once (origin at its centre, rotated by
/// `init_angle`) and paints the initial value. Every [`Gauge::set_value`]
/// repaints the whole gauge and leaves the surface in that same frame.
///
/// ```no_run
/// use gauge::{labels, Canvas, Gauge, GaugeConfig};
///
/// let config = GaugeConfig::builder()
///     .values(labels(["Low", "Mid", "High"]))
///     .build();
/// let mut gauge = Gauge::new(Canvas::new(300, 300), config)?;
/// gauge.set_value("High");
/// # Ok::<(), gauge::GaugeError>(())
/// ```
pub struct Gauge<S: Surface> {
    config: GaugeConfig,
    surface: S,
    radius: f64,
    // None when the last requested value is not in `values`
    selected: Option<usize>,
}

impl<S: Surface> Gauge<S> {
    pub fn new(mut surface: S, config: GaugeConfig) -> Result<Self, GaugeError> {
        let (width, height) = (surface.width(), surface.height());
        let config = config.normalized();
        let radius = (f64::from(width.min(height)) / 2.0).round();

        surface.translate(
            (f64::from(width) / 2.0).round(),
            (f64::from(height) / 2.0).round(),
        );
        surface.rotate(config.init_angle);
        log::debug!(
            "gauge attached to {width}x{height} surface, radius {radius}, {} values",
            config.values.len()
        );

        let init_value = config.init_value.clone();
        let mut gauge = Self {
            config,
            surface,
            radius,
            selected: None,
        };
        match init_value {
            Some(value) => gauge.set_value(value),
            None => gauge.redraw(),
        }
        Ok(gauge)
    }

    /// Looks `selector` up in `source` and builds a gauge on the surface found.
    pub fn from_source<Src>(
        source: &mut Src,
        selector: &str,
        config: GaugeConfig,
    ) -> Result<Self, GaugeError>
    where
        Src: SurfaceSource<Surface = S>,
    {
        let surface = source
            .acquire(selector)
            .ok_or_else(|| GaugeError::Surface(format!("no surface matches `{selector}`")))?;
        log::debug!("acquired surface for `{selector}`");
        Self::new(surface, config)
    }

    /// Selects `value` and repaints. A value missing from `values` selects
    /// index -1, which points the hand one step before the start of the arc.
    pub fn set_value(&mut self, value: impl Into<Label>) {
        let value = value.into();
        self.selected = self.config.index_of(&value);
        if self.selected.is_none() {
            log::debug!("value {value} is not one of the gauge values");
        }
        self.redraw();
    }

    /// Angle of tick `n` in the gauge-local frame.
    pub fn angle_of(&self, n: isize) -> f64 {
        tick_angle(self.config.values.len(), self.config.delta_angle, n)
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The transform every public call leaves the surface in.
    pub fn local_frame(&self) -> Transform {
        let (width, height) = (f64::from(self.surface.width()), f64::from(self.surface.height()));
        Transform::IDENTITY
            .translate((width / 2.0).round(), (height / 2.0).round())
            .rotate(self.config.init_angle)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn selected_angle(&self) -> f64 {
        let index = self.selected.map_or(-1, |i| i as isize);
        self.angle_of(index)
    }

    fn redraw(&mut self) {
        let angle = self.selected_angle();
        log::trace!("redrawing gauge, hand at {angle} rad");
        let radius = self.radius;
        let surface = &mut self.surface;
        surface.clear_rect(-radius, -radius, 2.0 * radius, 2.0 * radius);
        draw_rim(surface, &self.config, radius);
        draw_ticks(surface, &self.config, radius);
        draw_hand(surface, &self.config, radius, angle);
    }
}
