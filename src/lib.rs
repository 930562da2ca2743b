//! tickline: headless zoomable, pannable infinite-axis widget core.
//!
//! A `Tickline` maps a continuous global index onto a strip of screen,
//! draws any number of interval grids over it and resolves pan and pinch
//! gestures into viewport changes. A `Roulette` builds a value picker on top
//! of it. Rasterization and momentum physics are pluggable collaborators.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{Roulette, Tickline, TicklineConfig, TicklineEvent};
pub use error::{TicklineError, TicklineResult};
