//! Synthetic page descriptions for replaying sessions without a browser
//!
//! A scene lists element placements in document coordinates plus a script of
//! user actions. [`SceneGeometry`] serves those placements through
//! [`GeometryProvider`] for the current scroll offset.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::ColorZone;
use crate::geometry::{ElementId, ElementRect, GeometryProvider, ViewportState};
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    /// Whether the page has a header surface to color
    #[serde(default = "default_true")]
    pub header: bool,
    #[serde(default)]
    pub zones: Vec<ZoneSpec>,
    #[serde(default)]
    pub reveal: Vec<BlockSpec>,
    #[serde(default)]
    pub carousel: Option<CarouselSpec>,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

/// Color zone placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub id: String,
    pub top: f64,
    pub height: f64,
    pub color: String,
}

/// Revealable block placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSpec {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselSpec {
    pub slides: usize,
    /// Markers authored in the markup before the carousel binds
    #[serde(default)]
    pub markers: usize,
}

/// One scripted user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Scroll to an absolute document offset
    Scroll(f64),
    /// Let time pass
    WaitMs(u64),
    /// Press the next or previous button
    Navigate(Direction),
    /// Click the indicator marker at this position
    Indicator(usize),
    /// Click an arbitrary element inside the indicator strip
    Click(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Prev,
}

/// Longest single `wait_ms` step accepted (one day)
pub const MAX_WAIT_MS: u64 = 24 * 60 * 60 * 1000;

fn default_viewport_height() -> f64 {
    800.0
}

fn default_true() -> bool {
    true
}

impl Scene {
    /// Load and validate a scene file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate scene TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scene: Scene = toml::from_str(content)?;
        scene.validate()?;
        Ok(scene)
    }

    fn validate(&self) -> Result<()> {
        if !(self.viewport_height > 0.0) {
            return Err(Error::Scene(format!(
                "viewport_height must be positive, got {}",
                self.viewport_height
            )));
        }

        let mut seen = HashSet::new();
        let placements = self
            .zones
            .iter()
            .map(|z| (&z.id, z.top, z.height))
            .chain(self.reveal.iter().map(|b| (&b.id, b.top, b.height)));

        for (id, top, height) in placements {
            if !top.is_finite() || !height.is_finite() || height < 0.0 {
                return Err(Error::Scene(format!(
                    "element '{}' has invalid placement (top={}, height={})",
                    id, top, height
                )));
            }
            if !seen.insert(id) {
                return Err(Error::Scene(format!("duplicate element id '{}'", id)));
            }
        }

        for step in &self.script {
            if let ScriptStep::WaitMs(ms) = step {
                if *ms > MAX_WAIT_MS {
                    return Err(Error::Scene(format!(
                        "wait_ms {} exceeds the {} ms limit",
                        ms, MAX_WAIT_MS
                    )));
                }
            }
        }

        Ok(())
    }

    /// Zones in document order, as the background controller consumes them
    pub fn color_zones(&self) -> Vec<ColorZone> {
        self.zones
            .iter()
            .map(|z| ColorZone::new(z.id.as_str(), z.color.as_str()))
            .collect()
    }

    pub fn reveal_targets(&self) -> Vec<ElementId> {
        self.reveal.iter().map(|b| ElementId::new(b.id.as_str())).collect()
    }

    /// Layout of every placed element, scrolled to the top
    pub fn geometry(&self) -> SceneGeometry {
        let rects = self
            .zones
            .iter()
            .map(|z| (ElementId::new(z.id.as_str()), (z.top, z.height)))
            .chain(
                self.reveal
                    .iter()
                    .map(|b| (ElementId::new(b.id.as_str()), (b.top, b.height))),
            )
            .collect();

        SceneGeometry {
            rects,
            scroll_offset: 0.0,
            viewport_height: self.viewport_height,
        }
    }
}

/// Static document layout with a movable scroll offset
#[derive(Debug, Clone)]
pub struct SceneGeometry {
    /// Document-coordinate (top, height) per element
    rects: HashMap<ElementId, (f64, f64)>,
    scroll_offset: f64,
    viewport_height: f64,
}

impl SceneGeometry {
    /// Bottom edge of the lowest element
    pub fn document_height(&self) -> f64 {
        self.rects
            .values()
            .map(|(top, height)| top + height)
            .fold(0.0, f64::max)
    }

    /// Largest offset that still fills the viewport
    pub fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height).max(0.0)
    }

    /// Scroll to `offset`, clamped to the scrollable range. Returns the
    /// offset actually applied.
    pub fn scroll_to(&mut self, offset: f64) -> f64 {
        self.scroll_offset = offset.clamp(0.0, self.max_scroll());
        self.scroll_offset
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }
}

impl GeometryProvider for SceneGeometry {
    fn element_geometry(&self, element: &ElementId) -> Option<ElementRect> {
        self.rects
            .get(element)
            .map(|(top, height)| ElementRect::new(top - self.scroll_offset, *height))
    }

    fn viewport(&self) -> ViewportState {
        ViewportState {
            scroll_offset: self.scroll_offset,
            viewport_height: self.viewport_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r##"
viewport_height = 800

[[zones]]
id = "hero"
top = 0
height = 500
color = "A"

[[zones]]
id = "gallery"
top = 400
height = 500
color = "B"

[[reveal]]
id = "intro"
top = 1200
height = 300

[carousel]
slides = 3

[[script]]
scroll = 300

[[script]]
wait_ms = 3000

[[script]]
navigate = "next"

[[script]]
indicator = 2

[[script]]
click = "indicator"
"##;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_toml_str(SCENE).unwrap();
        assert_eq!(scene.viewport_height, 800.0);
        assert!(scene.header);
        assert_eq!(scene.zones.len(), 2);
        assert_eq!(scene.reveal_targets(), vec![ElementId::from("intro")]);
        assert_eq!(scene.carousel.as_ref().map(|c| (c.slides, c.markers)), Some((3, 0)));
        assert_eq!(
            scene.script,
            vec![
                ScriptStep::Scroll(300.0),
                ScriptStep::WaitMs(3000),
                ScriptStep::Navigate(Direction::Next),
                ScriptStep::Indicator(2),
                ScriptStep::Click("indicator".to_string()),
            ]
        );
    }

    #[test]
    fn test_geometry_is_viewport_relative() {
        let scene = Scene::from_toml_str(SCENE).unwrap();
        let mut geometry = scene.geometry();
        assert_eq!(geometry.document_height(), 1500.0);
        assert_eq!(geometry.max_scroll(), 700.0);

        assert_eq!(geometry.scroll_to(300.0), 300.0);
        let rect = geometry.element_geometry(&"gallery".into()).unwrap();
        assert_eq!(rect, ElementRect::new(100.0, 500.0));
        assert!(geometry.element_geometry(&"missing".into()).is_none());

        assert_eq!(geometry.scroll_to(5000.0), 700.0);
        assert_eq!(geometry.scroll_to(-10.0), 0.0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Scene::from_toml_str(
            r##"
[[zones]]
id = "a"
top = 0
height = 10
color = "red"

[[reveal]]
id = "a"
top = 0
height = 10
"##,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Scene(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_negative_height_rejected() {
        let err = Scene::from_toml_str(
            r##"
[[reveal]]
id = "a"
top = 0
height = -1
"##,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Scene(_)));
    }

    #[test]
    fn test_bad_viewport_rejected() {
        let err = Scene::from_toml_str("viewport_height = 0").unwrap_err();
        assert!(matches!(err, Error::Scene(_)));
    }

    #[test]
    fn test_oversized_wait_rejected() {
        let err = Scene::from_toml_str(
            r##"
[[script]]
wait_ms = 9000000000000000000
"##,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Scene(_)));

        let scene = Scene::from_toml_str(&format!("[[script]]\nwait_ms = {}\n", MAX_WAIT_MS)).unwrap();
        assert_eq!(scene.script, vec![ScriptStep::WaitMs(MAX_WAIT_MS)]);
    }

    #[test]
    fn test_malformed_toml_is_toml_error() {
        let err = Scene::from_toml_str("[[zones]\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
