use tracing::debug;

use super::resolver::{resolve_color, ColorZone, TriggerRatio};
use super::validity::{ColorValidator, CssColorValidator};
use crate::config::BackgroundConfig;
use crate::geometry::GeometryProvider;

/// Surface whose background follows the resolved color
pub trait ColorSink {
    fn apply(&mut self, color: &str);
}

impl<F> ColorSink for F
where
    F: FnMut(&str),
{
    fn apply(&mut self, color: &str) {
        self(color)
    }
}

/// Page background controller
///
/// Call [`evaluate`](Self::evaluate) once when the page is ready and
/// [`on_scroll`](Self::on_scroll) for every scroll notification. Each pass
/// recomputes the trigger line, resolves the zone color from scratch and
/// pushes it to the header sink (if any) and then the body sink.
pub struct BackgroundColorController<G> {
    geometry: G,
    zones: Vec<ColorZone>,
    trigger_ratio: TriggerRatio,
    default_color: String,
    validator: Box<dyn ColorValidator>,
    header: Option<Box<dyn ColorSink>>,
    body: Box<dyn ColorSink>,
    active_color: Option<String>,
}

impl<G: GeometryProvider> BackgroundColorController<G> {
    pub const DEFAULT_COLOR: &'static str = "#d4ccc4";

    /// Create a controller with the default color and a full-height trigger line
    pub fn new(geometry: G, body: impl ColorSink + 'static) -> Self {
        Self {
            geometry,
            zones: Vec::new(),
            trigger_ratio: TriggerRatio::default(),
            default_color: Self::DEFAULT_COLOR.to_string(),
            validator: Box::new(CssColorValidator),
            header: None,
            body: Box::new(body),
            active_color: None,
        }
    }

    /// Create a controller from the `[background]` config section
    pub fn from_config(
        config: &BackgroundConfig,
        geometry: G,
        body: impl ColorSink + 'static,
    ) -> Self {
        Self::new(geometry, body)
            .with_trigger_ratio(config.trigger_ratio())
            .with_default_color(config.default_color.clone())
    }

    pub fn with_zones(mut self, zones: Vec<ColorZone>) -> Self {
        self.zones = zones;
        self
    }

    pub fn with_trigger_ratio(mut self, ratio: TriggerRatio) -> Self {
        self.trigger_ratio = ratio;
        self
    }

    pub fn with_default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = color.into();
        self
    }

    pub fn with_validator(mut self, validator: impl ColorValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Attach the header surface. Without one only the body is colored.
    pub fn with_header(mut self, header: impl ColorSink + 'static) -> Self {
        self.header = Some(Box::new(header));
        self
    }

    /// Replace the zone list, e.g. after the host re-queried its markup
    pub fn set_zones(&mut self, zones: Vec<ColorZone>) {
        self.zones = zones;
    }

    pub fn zones(&self) -> &[ColorZone] {
        &self.zones
    }

    pub fn trigger_ratio(&self) -> TriggerRatio {
        self.trigger_ratio
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    /// Color applied by the most recent pass
    pub fn active_color(&self) -> Option<&str> {
        self.active_color.as_deref()
    }

    /// Run one full resolution pass and apply the result
    pub fn evaluate(&mut self) -> &str {
        let trigger_line = self.trigger_ratio.trigger_line(self.geometry.viewport());
        let color = resolve_color(
            trigger_line,
            &self.zones,
            &self.geometry,
            self.validator.as_ref(),
            &self.default_color,
        );
        debug!(trigger_line, color = %color, "background color resolved");

        // Header first so both surfaces change in the same frame
        if let Some(header) = self.header.as_mut() {
            header.apply(&color);
        }
        self.body.apply(&color);

        self.active_color.insert(color).as_str()
    }

    /// Scroll notification; every call triggers a full pass
    pub fn on_scroll(&mut self) -> &str {
        self.evaluate()
    }
}
