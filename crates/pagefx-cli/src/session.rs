//! A page assembled from a scene file, with recording sinks

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use pagefx_core::scene::{Direction, SceneGeometry, ScriptStep};
use pagefx_core::{
    AppConfig, BackgroundColorController, CarouselController, ElementId, NavigationIntent,
    PageController, PageEvent, PageOutcome, PageParts, RevealController, Scene, Scheduler,
    TimerHandle, VirtualCarousel,
};

type Log = Rc<RefCell<Vec<String>>>;
type RevealRecorder = Box<dyn FnMut(&ElementId)>;

/// Outcome of one script step
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: ScriptStep,
    pub outcomes: Vec<PageOutcome>,
}

/// Everything observed while replaying a scene
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub initial_color: Option<String>,
    pub steps: Vec<StepReport>,
    pub final_color: Option<String>,
    pub header_updates: usize,
    pub body_updates: usize,
    pub revealed: Vec<String>,
    pub carousel: Option<VirtualCarousel>,
    pub slide: Option<usize>,
}

pub struct Session<S: Scheduler> {
    page: PageController<SceneGeometry, RevealRecorder, VirtualCarousel, S>,
    header: Log,
    body: Log,
    revealed: Log,
    steps: Vec<StepReport>,
    initial_color: Option<String>,
}

impl<S: Scheduler> Session<S> {
    /// Activate a page for `scene`. Reveals are derived from geometry on
    /// every scroll since there is no visibility observer.
    pub fn new(config: &AppConfig, scene: &Scene, scheduler: S) -> Self {
        let header = Log::default();
        let body = Log::default();
        let revealed = Log::default();

        let mut background = BackgroundColorController::from_config(
            &config.background,
            scene.geometry(),
            recorder(&body),
        )
        .with_zones(scene.color_zones());
        if scene.header {
            background = background.with_header(recorder(&header));
        }

        let mut reveal = {
            let revealed = Rc::clone(&revealed);
            let sink: RevealRecorder =
                Box::new(move |element: &ElementId| revealed.borrow_mut().push(element.to_string()));
            RevealController::new(sink)
        };
        reveal.watch_all(scene.reveal_targets());

        let carousel = scene.carousel.as_ref().map(|spec| {
            let view = VirtualCarousel::new(spec.slides).with_markers(spec.markers);
            CarouselController::new(view, scheduler)
        });

        let page = PageController::activate(PageParts {
            background,
            reveal,
            carousel,
            scan_reveals: true,
        });
        let initial_color = page.background().active_color().map(str::to_string);

        Self {
            page,
            header,
            body,
            revealed,
            steps: Vec::new(),
            initial_color,
        }
    }

    pub fn scheduler_mut(&mut self) -> Option<&mut S> {
        self.page.carousel_mut().map(|c| c.scheduler_mut())
    }

    /// Apply an instantaneous step. Waiting is left to the caller, which owns
    /// the clock.
    pub fn apply(&mut self, step: &ScriptStep) -> Vec<PageOutcome> {
        match step {
            ScriptStep::Scroll(offset) => {
                let applied = self
                    .page
                    .background_mut()
                    .geometry_mut()
                    .scroll_to(*offset);
                tracing::debug!(requested = offset, applied, "scrolled");
                vec![self.page.dispatch(PageEvent::Scroll)]
            }
            ScriptStep::Navigate(direction) => {
                let intent = match direction {
                    Direction::Next => NavigationIntent::Next,
                    Direction::Prev => NavigationIntent::Prev,
                };
                vec![self.page.dispatch(PageEvent::Navigate(intent))]
            }
            ScriptStep::Indicator(position) => {
                // A position past the strip is a click that missed every marker
                let target = self
                    .page
                    .carousel()
                    .and_then(|c| c.view().marker_id(*position).cloned())
                    .unwrap_or_else(|| ElementId::new("indicator"));
                vec![self
                    .page
                    .dispatch(PageEvent::Navigate(NavigationIntent::Indicator(target)))]
            }
            ScriptStep::Click(id) => {
                let intent = NavigationIntent::Indicator(ElementId::new(id.as_str()));
                vec![self.page.dispatch(PageEvent::Navigate(intent))]
            }
            ScriptStep::WaitMs(_) => Vec::new(),
        }
    }

    pub fn tick(&mut self, handle: TimerHandle) -> PageOutcome {
        self.page.dispatch(PageEvent::TimerTick(handle))
    }

    pub fn record(&mut self, step: ScriptStep, outcomes: Vec<PageOutcome>) {
        self.steps.push(StepReport { step, outcomes });
    }

    pub fn finish(mut self) -> SessionReport {
        self.page.shutdown();

        let carousel = self.page.carousel().map(|c| c.view().clone());
        let slide = self.page.carousel().map(|c| c.index());
        let header_updates = self.header.borrow().len();
        let body_updates = self.body.borrow().len();
        let final_color = self.body.borrow().last().cloned();
        let revealed = self.revealed.borrow().clone();

        SessionReport {
            initial_color: self.initial_color,
            steps: self.steps,
            final_color,
            header_updates,
            body_updates,
            revealed,
            carousel,
            slide,
        }
    }
}

fn recorder(log: &Log) -> impl FnMut(&str) + 'static {
    let log = Rc::clone(log);
    move |color: &str| log.borrow_mut().push(color.to_string())
}
