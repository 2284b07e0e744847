use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::view::CarouselView;
use crate::geometry::ElementId;
use crate::schedule::{Scheduler, TimerHandle};

/// Fixed autoplay period
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(3000);

/// Lifecycle state of a carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CarouselState {
    /// No slides: inert, no timer, navigation ignored
    Idle,
    /// At least one slide; autoplay armed
    Active,
}

/// Manual navigation request from the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationIntent {
    Next,
    Prev,
    /// Click on the indicator strip; `target` is the clicked element
    Indicator(ElementId),
}

/// Rotating slide carousel with autoplay and an indicator strip
///
/// The index always stays in `[0, total_slides)`. Manual navigation
/// re-arms autoplay so the next automatic advance happens one full
/// [`AUTOPLAY_INTERVAL`] after the last interaction.
#[derive(Debug)]
pub struct CarouselController<V, S> {
    view: V,
    scheduler: S,
    total_slides: usize,
    index: usize,
    autoplay: Option<TimerHandle>,
}

impl<V: CarouselView, S: Scheduler> CarouselController<V, S> {
    /// Bind to `view` and start autoplay. A view without slides yields an
    /// idle controller.
    pub fn new(view: V, scheduler: S) -> Self {
        let total_slides = view.slide_count();
        let mut carousel = Self {
            view,
            scheduler,
            total_slides,
            index: 0,
            autoplay: None,
        };

        if carousel.state() == CarouselState::Idle {
            debug!("Carousel has no slides, staying idle");
            return carousel;
        }

        carousel.go_to(0);
        carousel.restart_autoplay();
        debug!(total_slides, "Carousel initialized");
        carousel
    }

    pub fn state(&self) -> CarouselState {
        if self.total_slides == 0 {
            CarouselState::Idle
        } else {
            CarouselState::Active
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn total_slides(&self) -> usize {
        self.total_slides
    }

    /// Handle of the armed autoplay task, if any
    pub fn autoplay_handle(&self) -> Option<TimerHandle> {
        self.autoplay
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Wrap any integer into `[0, total_slides)`
    pub fn normalize(&self, index: i64) -> Option<usize> {
        if self.total_slides == 0 {
            return None;
        }
        let total = self.total_slides as i64;
        Some((((index % total) + total) % total) as usize)
    }

    /// Show the slide at `index` (wrapped). Does not touch autoplay.
    pub fn go_to(&mut self, index: i64) -> Option<usize> {
        let index = self.normalize(index)?;
        self.index = index;
        self.view.set_offset_percent(0.0 - index as f64 * 100.0);
        self.refresh_indicators();
        trace!(index, "carousel moved");
        Some(index)
    }

    /// Manual step forward; re-arms autoplay
    pub fn next(&mut self) -> Option<usize> {
        let index = self.go_to(self.index as i64 + 1)?;
        self.restart_autoplay();
        Some(index)
    }

    /// Manual step backward; re-arms autoplay
    pub fn prev(&mut self) -> Option<usize> {
        let index = self.go_to(self.index as i64 - 1)?;
        self.restart_autoplay();
        Some(index)
    }

    /// Manual jump to an absolute (wrapped) index; re-arms autoplay
    pub fn jump_to(&mut self, index: i64) -> Option<usize> {
        let index = self.go_to(index)?;
        self.restart_autoplay();
        Some(index)
    }

    /// Navigation notification. Returns the new index, or `None` when the
    /// intent was ignored (idle carousel, click outside any marker).
    pub fn on_navigate(&mut self, intent: &NavigationIntent) -> Option<usize> {
        let result = match intent {
            NavigationIntent::Next => self.next(),
            NavigationIntent::Prev => self.prev(),
            NavigationIntent::Indicator(target) => {
                let Some(position) = self.view.marker_position(target) else {
                    trace!(%target, "indicator click outside markers ignored");
                    return None;
                };
                self.jump_to(position as i64)
            }
        };
        if let Some(index) = result {
            debug!(?intent, index, "carousel navigated");
        }
        result
    }

    /// Timer notification. Only the currently armed handle advances the
    /// carousel; ticks from cancelled tasks are dropped.
    pub fn on_timer_tick(&mut self, handle: TimerHandle) -> Option<usize> {
        if self.autoplay != Some(handle) {
            trace!(%handle, "stale autoplay tick dropped");
            return None;
        }
        let index = self.go_to(self.index as i64 + 1)?;
        debug!(index, "carousel autoplay advanced");
        Some(index)
    }

    /// Release the autoplay task. Later ticks are ignored.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.autoplay.take() {
            self.scheduler.cancel(handle);
            debug!(%handle, "carousel autoplay stopped");
        }
    }

    /// Cancel the armed task, then start a fresh one
    fn restart_autoplay(&mut self) {
        if self.total_slides == 0 {
            return;
        }
        if let Some(old) = self.autoplay.take() {
            self.scheduler.cancel(old);
        }
        self.autoplay = Some(self.scheduler.start_recurring(AUTOPLAY_INTERVAL));
    }

    /// Rebuild the strip when its size drifted, then highlight the index
    fn refresh_indicators(&mut self) {
        if self.view.marker_count() != self.total_slides {
            debug!(
                found = self.view.marker_count(),
                expected = self.total_slides,
                "rebuilding carousel indicators"
            );
            self.view.rebuild_markers(self.total_slides);
        }
        for position in 0..self.view.marker_count() {
            self.view.set_marker_active(position, position == self.index);
        }
    }
}
