//! Carousel surface abstraction and an in-memory implementation.

use serde::Serialize;

use crate::geometry::ElementId;

/// The slide track and indicator strip of a carousel in the host page
pub trait CarouselView {
    /// Number of slide items in the track
    fn slide_count(&self) -> usize;

    /// Translate the track along the slide axis, in percent of one slide
    fn set_offset_percent(&mut self, percent: f64);

    fn marker_count(&self) -> usize;

    /// Discard every marker and create `count` fresh ones
    fn rebuild_markers(&mut self, count: usize);

    /// Position of `target` within the marker sequence, `None` when the
    /// element is not a marker
    fn marker_position(&self, target: &ElementId) -> Option<usize>;

    fn set_marker_active(&mut self, position: usize, active: bool);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: ElementId,
    pub active: bool,
}

/// Carousel surface kept entirely in memory
#[derive(Debug, Clone, Default, Serialize)]
pub struct VirtualCarousel {
    slides: usize,
    offset_percent: f64,
    markers: Vec<Marker>,
    rebuilds: usize,
}

impl VirtualCarousel {
    pub fn new(slides: usize) -> Self {
        Self {
            slides,
            ..Default::default()
        }
    }

    /// Start with hand-authored markers, which may not match the slide count
    pub fn with_markers(mut self, count: usize) -> Self {
        self.markers = Self::fresh_markers(count);
        self
    }

    pub fn offset_percent(&self) -> f64 {
        self.offset_percent
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Position of the first highlighted marker
    pub fn active_marker(&self) -> Option<usize> {
        self.markers.iter().position(|m| m.active)
    }

    /// How many times the marker strip was rebuilt
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Id of the marker at `position`
    pub fn marker_id(&self, position: usize) -> Option<&ElementId> {
        self.markers.get(position).map(|m| &m.id)
    }

    /// Remove a marker, as a script editing the strip would
    pub fn remove_marker(&mut self, position: usize) {
        if position < self.markers.len() {
            self.markers.remove(position);
        }
    }

    fn fresh_markers(count: usize) -> Vec<Marker> {
        (0..count)
            .map(|i| Marker {
                id: ElementId::new(format!("indicator-{i}")),
                active: false,
            })
            .collect()
    }
}

impl CarouselView for VirtualCarousel {
    fn slide_count(&self) -> usize {
        self.slides
    }

    fn set_offset_percent(&mut self, percent: f64) {
        self.offset_percent = percent;
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn rebuild_markers(&mut self, count: usize) {
        self.markers = Self::fresh_markers(count);
        self.rebuilds += 1;
    }

    fn marker_position(&self, target: &ElementId) -> Option<usize> {
        self.markers.iter().position(|m| &m.id == target)
    }

    fn set_marker_active(&mut self, position: usize, active: bool) {
        if let Some(marker) = self.markers.get_mut(position) {
            marker.active = active;
        }
    }
}
