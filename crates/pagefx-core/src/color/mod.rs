//! Scroll-driven page background color
//!
//! - `validity` - Color value predicate ([`ColorValidator`], [`CssColorValidator`])
//! - `resolver` - Pure zone resolution for a trigger line
//! - `background` - Controller applying the resolved color to header and body

pub mod background;
pub mod resolver;
pub mod validity;

pub use background::{BackgroundColorController, ColorSink};
pub use resolver::{resolve_color, ColorZone, TriggerRatio};
pub use validity::{ColorValidator, CssColorValidator};
