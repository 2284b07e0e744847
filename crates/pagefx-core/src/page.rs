//! Page-level wiring of the three controllers
//!
//! [`PageController::activate`] is the page-ready entry point. Afterwards the
//! host feeds every notification through [`PageController::dispatch`], one at
//! a time and in arrival order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::carousel::{CarouselController, CarouselState, CarouselView, NavigationIntent};
use crate::color::BackgroundColorController;
use crate::geometry::GeometryProvider;
use crate::reveal::{IntersectionEntry, RevealController, RevealSink};
use crate::schedule::{Scheduler, TimerHandle};

/// Notification delivered by the host environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageEvent {
    Scroll,
    Intersect(Vec<IntersectionEntry>),
    TimerTick(TimerHandle),
    Navigate(NavigationIntent),
}

/// What handling one event changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PageOutcome {
    /// Background pass ran; includes reveals fired by a scroll scan
    Scrolled { color: String, revealed: usize },
    Revealed(usize),
    /// Carousel moved to this index
    SlideChanged(usize),
    Ignored,
}

/// Controllers making up one page
pub struct PageParts<G, R, V, S> {
    pub background: BackgroundColorController<G>,
    pub reveal: RevealController<R>,
    /// `None` when the page has no carousel markup
    pub carousel: Option<CarouselController<V, S>>,
    /// Derive reveals from geometry on every scroll, for hosts without a
    /// visibility observer
    pub scan_reveals: bool,
}

pub struct PageController<G, R, V, S> {
    background: BackgroundColorController<G>,
    reveal: RevealController<R>,
    carousel: Option<CarouselController<V, S>>,
    scan_reveals: bool,
}

impl<G, R, V, S> PageController<G, R, V, S>
where
    G: GeometryProvider,
    R: RevealSink,
    V: CarouselView,
    S: Scheduler,
{
    /// Page-ready activation: paint the initial background, run an initial
    /// reveal scan when enabled, and keep the carousel only if it has slides.
    pub fn activate(parts: PageParts<G, R, V, S>) -> Self {
        let PageParts {
            background,
            reveal,
            carousel,
            scan_reveals,
        } = parts;

        let carousel = carousel.filter(|c| c.state() == CarouselState::Active);

        let mut page = Self {
            background,
            reveal,
            carousel,
            scan_reveals,
        };

        let color = page.background.evaluate().to_string();
        let revealed = if page.scan_reveals {
            page.reveal.scan(page.background.geometry())
        } else {
            0
        };

        info!(
            zones = page.background.zones().len(),
            watched = page.reveal.watches().len(),
            carousel = page.carousel.is_some(),
            color = %color,
            revealed,
            "Page activated"
        );
        page
    }

    /// Handle one notification to completion
    pub fn dispatch(&mut self, event: PageEvent) -> PageOutcome {
        debug!(?event, "dispatching page event");
        match event {
            PageEvent::Scroll => {
                let color = self.background.on_scroll().to_string();
                let revealed = if self.scan_reveals {
                    self.reveal.scan(self.background.geometry())
                } else {
                    0
                };
                PageOutcome::Scrolled { color, revealed }
            }
            PageEvent::Intersect(entries) => {
                match self.reveal.on_intersect_batch(&entries) {
                    0 => PageOutcome::Ignored,
                    fired => PageOutcome::Revealed(fired),
                }
            }
            PageEvent::TimerTick(handle) => self
                .carousel
                .as_mut()
                .and_then(|c| c.on_timer_tick(handle))
                .map_or(PageOutcome::Ignored, PageOutcome::SlideChanged),
            PageEvent::Navigate(intent) => self
                .carousel
                .as_mut()
                .and_then(|c| c.on_navigate(&intent))
                .map_or(PageOutcome::Ignored, PageOutcome::SlideChanged),
        }
    }

    pub fn background(&self) -> &BackgroundColorController<G> {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut BackgroundColorController<G> {
        &mut self.background
    }

    pub fn reveal(&self) -> &RevealController<R> {
        &self.reveal
    }

    pub fn carousel(&self) -> Option<&CarouselController<V, S>> {
        self.carousel.as_ref()
    }

    pub fn carousel_mut(&mut self) -> Option<&mut CarouselController<V, S>> {
        self.carousel.as_mut()
    }

    /// Stop background work owned by the page
    pub fn shutdown(&mut self) {
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.shutdown();
        }
    }
}
