//! Host page collaborators: element identity and layout lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to an element of the host page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vertical placement of an element relative to the viewport top
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementRect {
    pub top: f64,
    pub height: f64,
}

impl ElementRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Whether any part of the rect overlaps `[0, viewport_height)`
    pub fn intersects_viewport(&self, viewport_height: f64) -> bool {
        self.top < viewport_height && self.top + self.height > 0.0
    }
}

/// Ambient scroll state of the page
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportState {
    pub scroll_offset: f64,
    pub viewport_height: f64,
}

/// Layout lookup supplied by the host.
///
/// Every call reflects the layout at that moment; callers must not cache the
/// results across notifications.
pub trait GeometryProvider {
    /// Viewport-relative rect of `element`, or `None` when it is not laid out
    fn element_geometry(&self, element: &ElementId) -> Option<ElementRect>;

    fn viewport(&self) -> ViewportState;
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for &G {
    fn element_geometry(&self, element: &ElementId) -> Option<ElementRect> {
        (**self).element_geometry(element)
    }

    fn viewport(&self) -> ViewportState {
        (**self).viewport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_viewport() {
        assert!(ElementRect::new(0.0, 10.0).intersects_viewport(800.0));
        assert!(ElementRect::new(-5.0, 10.0).intersects_viewport(800.0));
        assert!(ElementRect::new(799.0, 10.0).intersects_viewport(800.0));
        assert!(!ElementRect::new(800.0, 10.0).intersects_viewport(800.0));
        assert!(!ElementRect::new(-10.0, 10.0).intersects_viewport(800.0));
    }

    #[test]
    fn test_element_id_display() {
        let id = ElementId::from("hero");
        assert_eq!(id.to_string(), "hero");
        assert_eq!(id.as_str(), "hero");
    }
}
