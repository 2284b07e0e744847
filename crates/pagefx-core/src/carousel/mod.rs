//! Image carousel
//!
//! - `view` - Surface trait for the slide track and indicator strip
//! - `controller` - Index state machine with autoplay and indicator upkeep

pub mod controller;
pub mod view;

pub use controller::{CarouselController, CarouselState, NavigationIntent, AUTOPLAY_INTERVAL};
pub use view::{CarouselView, Marker, VirtualCarousel};
