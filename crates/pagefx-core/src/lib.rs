pub mod carousel;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod page;
pub mod reveal;
pub mod scene;
pub mod schedule;

pub use carousel::{CarouselController, CarouselView, NavigationIntent, VirtualCarousel, AUTOPLAY_INTERVAL};
pub use color::{BackgroundColorController, ColorSink, ColorValidator, ColorZone, CssColorValidator, TriggerRatio};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use geometry::{ElementId, ElementRect, GeometryProvider, ViewportState};
pub use page::{PageController, PageEvent, PageOutcome, PageParts};
pub use reveal::{IntersectionEntry, RevealController, RevealSink};
pub use scene::Scene;
pub use schedule::{ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
