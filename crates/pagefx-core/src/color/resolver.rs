//! Scroll-position to background-color resolution
//!
//! Pure functions: every call re-reads geometry, nothing is memoized.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::validity::ColorValidator;
use crate::geometry::{ElementId, GeometryProvider, ViewportState};

/// A page region associated with a candidate background color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorZone {
    pub element: ElementId,
    pub raw_color: String,
}

impl ColorZone {
    pub fn new(element: impl Into<ElementId>, raw_color: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            raw_color: raw_color.into(),
        }
    }
}

/// Fraction of the viewport height, always within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TriggerRatio(f64);

impl TriggerRatio {
    /// Clamp a raw ratio into [0, 1]. NaN maps to 0.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            Self(0.0)
        } else {
            Self(raw.clamp(0.0, 1.0))
        }
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Document-coordinate y of the trigger line for the given viewport
    #[inline]
    pub fn trigger_line(self, viewport: ViewportState) -> f64 {
        viewport.scroll_offset + viewport.viewport_height * self.0
    }
}

impl Default for TriggerRatio {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Resolve the color for `trigger_line`.
///
/// Scans every zone in order; each zone whose document extent
/// `[top, top + height)` contains the line and whose color passes
/// `validator` overwrites the result. The last such zone wins. Zones without
/// geometry or with an invalid color leave the result untouched.
pub fn resolve_color<G, V>(
    trigger_line: f64,
    zones: &[ColorZone],
    geometry: &G,
    validator: &V,
    default_color: &str,
) -> String
where
    G: GeometryProvider + ?Sized,
    V: ColorValidator + ?Sized,
{
    let scroll_offset = geometry.viewport().scroll_offset;
    let mut resolved = default_color;

    for zone in zones {
        let Some(rect) = geometry.element_geometry(&zone.element) else {
            trace!(zone = %zone.element, "zone has no geometry, skipped");
            continue;
        };

        let top = rect.top + scroll_offset;
        let bottom = top + rect.height;
        if trigger_line < top || trigger_line >= bottom {
            continue;
        }

        if validator.is_valid_color(&zone.raw_color) {
            resolved = zone.raw_color.as_str();
        } else {
            trace!(
                zone = %zone.element,
                color = %zone.raw_color,
                "matching zone has invalid color, ignored"
            );
        }
    }

    resolved.to_string()
}
