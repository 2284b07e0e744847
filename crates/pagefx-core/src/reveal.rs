//! One-shot reveal of content blocks as they scroll into view

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::geometry::{ElementId, GeometryProvider};

/// Receives the terminal reveal transition for an element
pub trait RevealSink {
    fn mark_revealed(&mut self, element: &ElementId);
}

impl<F> RevealSink for F
where
    F: FnMut(&ElementId),
{
    fn mark_revealed(&mut self, element: &ElementId) {
        self(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealWatch {
    pub element: ElementId,
    pub fired: bool,
}

/// Visibility change reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub element: ElementId,
    pub entering: bool,
}

impl IntersectionEntry {
    pub fn entering(element: impl Into<ElementId>) -> Self {
        Self {
            element: element.into(),
            entering: true,
        }
    }
}

/// Watch list that reveals each element at most once
pub struct RevealController<S> {
    sink: S,
    watches: Vec<RevealWatch>,
    active: HashSet<ElementId>,
}

impl<S: RevealSink> RevealController<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            watches: Vec::new(),
            active: HashSet::new(),
        }
    }

    /// Start watching `element`. Elements already known are left as they are.
    pub fn watch(&mut self, element: impl Into<ElementId>) {
        let element = element.into();
        if self.watches.iter().any(|w| w.element == element) {
            return;
        }
        self.active.insert(element.clone());
        self.watches.push(RevealWatch {
            element,
            fired: false,
        });
    }

    pub fn watch_all<I, E>(&mut self, elements: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<ElementId>,
    {
        for element in elements {
            self.watch(element);
        }
    }

    /// Visibility notification. Returns true when this call fired the reveal.
    pub fn on_intersect(&mut self, element: &ElementId, entering: bool) -> bool {
        if !entering || !self.active.remove(element) {
            return false;
        }

        if let Some(watch) = self.watches.iter_mut().find(|w| &w.element == element) {
            watch.fired = true;
        }
        self.sink.mark_revealed(element);
        debug!(%element, "element revealed");
        true
    }

    /// Process a batch of notifications in order. Returns how many fired.
    pub fn on_intersect_batch(&mut self, entries: &[IntersectionEntry]) -> usize {
        entries
            .iter()
            .filter(|entry| self.on_intersect(&entry.element, entry.entering))
            .count()
    }

    /// Derive entering notifications from layout: any active element with
    /// at least one pixel inside the viewport is revealed.
    pub fn scan<G: GeometryProvider + ?Sized>(&mut self, geometry: &G) -> usize {
        let viewport_height = geometry.viewport().viewport_height;
        let visible: Vec<ElementId> = self
            .watches
            .iter()
            .filter(|w| !w.fired)
            .filter(|w| {
                geometry
                    .element_geometry(&w.element)
                    .is_some_and(|rect| rect.intersects_viewport(viewport_height))
            })
            .map(|w| w.element.clone())
            .collect();

        trace!(candidates = visible.len(), "reveal scan");
        visible
            .iter()
            .filter(|element| self.on_intersect(element, true))
            .count()
    }

    pub fn is_revealed(&self, element: &ElementId) -> bool {
        self.watches
            .iter()
            .any(|w| w.fired && &w.element == element)
    }

    /// Elements still waiting for their first appearance
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn watches(&self) -> &[RevealWatch] {
        &self.watches
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::geometry::{ElementRect, ViewportState};

    #[derive(Debug, Default, PartialEq)]
    struct Recorder(Vec<ElementId>);

    impl RevealSink for Recorder {
        fn mark_revealed(&mut self, element: &ElementId) {
            self.0.push(element.clone());
        }
    }

    type Controller = RevealController<Recorder>;

    fn controller(elements: &[&str]) -> Controller {
        let mut controller = RevealController::new(Recorder::default());
        controller.watch_all(elements.iter().copied());
        controller
    }

    #[test]
    fn test_reveal_fires_once() {
        let mut controller = controller(&["intro"]);
        let intro = ElementId::from("intro");

        assert!(controller.on_intersect(&intro, true));
        assert!(!controller.on_intersect(&intro, true));
        assert_eq!(controller.sink().0, vec![intro.clone()]);
        assert!(controller.is_revealed(&intro));
        assert_eq!(controller.active_count(), 0);
    }

    #[test]
    fn test_leaving_is_ignored() {
        let mut controller = controller(&["intro"]);
        let intro = ElementId::from("intro");

        assert!(!controller.on_intersect(&intro, false));
        assert!(!controller.is_revealed(&intro));
        assert_eq!(controller.active_count(), 1);
    }

    #[test]
    fn test_never_unreveals() {
        let mut controller = controller(&["intro"]);
        let intro = ElementId::from("intro");
        controller.on_intersect(&intro, true);
        controller.on_intersect(&intro, false);
        controller.watch("intro");

        assert!(controller.is_revealed(&intro));
        assert_eq!(controller.active_count(), 0);
        assert_eq!(controller.sink().0.len(), 1);
    }

    #[test]
    fn test_unwatched_element_ignored() {
        let mut controller = controller(&["intro"]);
        assert!(!controller.on_intersect(&ElementId::from("footer"), true));
        assert!(controller.sink().0.is_empty());
    }

    #[test]
    fn test_batch_in_order() {
        let mut controller = controller(&["a", "b", "c"]);
        let fired = controller.on_intersect_batch(&[
            IntersectionEntry::entering("c"),
            IntersectionEntry {
                element: "b".into(),
                entering: false,
            },
            IntersectionEntry::entering("a"),
            IntersectionEntry::entering("c"),
        ]);

        assert_eq!(fired, 2);
        assert_eq!(controller.sink().0, vec![ElementId::from("c"), ElementId::from("a")]);
    }

    struct Layout {
        scroll: f64,
        tops: HashMap<&'static str, f64>,
    }

    impl GeometryProvider for Layout {
        fn element_geometry(&self, element: &ElementId) -> Option<ElementRect> {
            self.tops
                .get(element.as_str())
                .map(|top| ElementRect::new(top - self.scroll, 200.0))
        }

        fn viewport(&self) -> ViewportState {
            ViewportState {
                scroll_offset: self.scroll,
                viewport_height: 600.0,
            }
        }
    }

    #[test]
    fn test_scan_reveals_visible_elements() {
        let mut controller = controller(&["top", "middle", "bottom", "detached"]);
        let mut layout = Layout {
            scroll: 0.0,
            tops: HashMap::from([("top", 100.0), ("middle", 900.0), ("bottom", 2000.0)]),
        };

        assert_eq!(controller.scan(&layout), 1);
        assert!(controller.is_revealed(&"top".into()));

        layout.scroll = 500.0;
        assert_eq!(controller.scan(&layout), 1);
        assert!(controller.is_revealed(&"middle".into()));

        // Scrolling back does not fire again
        layout.scroll = 0.0;
        assert_eq!(controller.scan(&layout), 0);
        assert_eq!(controller.active_count(), 2);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut controller = RevealController::new(|e: &ElementId| seen.push(e.to_string()));
            controller.watch("x");
            controller.on_intersect(&"x".into(), true);
        }
        assert_eq!(seen, vec!["x".to_string()]);
    }
}
